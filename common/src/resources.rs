/// A resource that stores the seconds since server start.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    /// Seconds elapsed since `earlier`. Negative if `earlier` is in the
    /// future.
    pub fn since(self, earlier: Time) -> f64 { self.0 - earlier.0 }
}

/// Simulation timestep of the current tick, in seconds.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeltaTime(pub f32);
