use crate::resources::Time;

/// Fire-once timer. Counts down from a duration and reports whether it has
/// elapsed. A timer that was never started (or was invalidated) reports as
/// elapsed, so "do this at most every N seconds" loops fire on their first
/// check.
#[derive(Copy, Clone, Debug, Default)]
pub struct CountdownTimer {
    end: f64,
    duration: f32,
    started: bool,
}

impl CountdownTimer {
    pub fn start(&mut self, now: Time, duration: f32) {
        self.end = now.0 + duration as f64;
        self.duration = duration;
        self.started = true;
    }

    /// Restart with the previously used duration.
    pub fn restart(&mut self, now: Time) {
        debug_assert!(self.started, "restarting a timer that never ran");
        self.end = now.0 + self.duration as f64;
    }

    pub fn invalidate(&mut self) { self.started = false; }

    pub fn has_started(&self) -> bool { self.started }

    pub fn is_elapsed(&self, now: Time) -> bool { !self.started || now.0 >= self.end }

    pub fn remaining(&self, now: Time) -> f32 {
        if self.started {
            (self.end - now.0).max(0.0) as f32
        } else {
            0.0
        }
    }
}

/// Elapsed-duration timer. Records a start instant and measures how long ago
/// that was.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntervalTimer {
    start: Option<f64>,
}

impl IntervalTimer {
    pub fn reset(&mut self, now: Time) { self.start = Some(now.0); }

    pub fn invalidate(&mut self) { self.start = None; }

    pub fn has_started(&self) -> bool { self.start.is_some() }

    /// Seconds since the last reset. An unstarted timer reports a huge
    /// elapsed time so staleness checks treat it as "long ago".
    pub fn elapsed(&self, now: Time) -> f64 {
        self.start.map_or(f64::MAX, |start| now.0 - start)
    }

    pub fn is_greater(&self, now: Time, duration: f32) -> bool {
        self.elapsed(now) > duration as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_unstarted_is_elapsed() {
        let timer = CountdownTimer::default();
        assert!(!timer.has_started());
        assert!(timer.is_elapsed(Time(0.0)));
    }

    #[test]
    fn countdown_elapses_after_duration() {
        let mut timer = CountdownTimer::default();
        timer.start(Time(10.0), 0.5);
        assert!(!timer.is_elapsed(Time(10.4)));
        assert!(timer.is_elapsed(Time(10.5)));
        assert!(timer.is_elapsed(Time(11.0)));
    }

    #[test]
    fn countdown_invalidate_reports_elapsed() {
        let mut timer = CountdownTimer::default();
        timer.start(Time(0.0), 100.0);
        timer.invalidate();
        assert!(timer.is_elapsed(Time(1.0)));
    }

    #[test]
    fn countdown_restart_reuses_duration() {
        let mut timer = CountdownTimer::default();
        timer.start(Time(0.0), 2.0);
        timer.restart(Time(10.0));
        assert!(!timer.is_elapsed(Time(11.9)));
        assert!(timer.is_elapsed(Time(12.0)));
    }

    #[test]
    fn interval_measures_elapsed() {
        let mut timer = IntervalTimer::default();
        assert!(timer.is_greater(Time(0.0), 9999.0));
        timer.reset(Time(5.0));
        assert!((timer.elapsed(Time(7.5)) - 2.5).abs() < f64::EPSILON);
        assert!(timer.is_greater(Time(7.5), 2.0));
        assert!(!timer.is_greater(Time(7.5), 3.0));
    }
}
