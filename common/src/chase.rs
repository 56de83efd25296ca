//! Chase path: a path follower specialized for pursuing a moving subject,
//! re-planning only when the subject has actually diverged from the path and
//! never more often than the repath throttle allows.

use crate::{
    cost::EdgeCost,
    nav::{AreaId, Locomotion, NavGraph},
    path::{PathFollower, PathProgress},
    resources::Time,
    timer::CountdownTimer,
    world::{EntityId, TraverseWhen, WorldQuery},
};
use tracing::trace;
use vek::*;

/// Minimum interval between repaths while a valid path exists.
const REPATH_THROTTLE: f32 = 0.5;
/// Backoff after a failed search, in seconds per meter of range to the
/// subject: distant subjects are retried lazily, close ones quickly.
const FAIL_BACKOFF_RATE: f32 = 0.005;
/// Repath tolerance at zero range.
const MIN_TOLERANCE: f32 = 2.0;
/// Growth of the repath tolerance per meter of range to the subject.
const TOLERANCE_RATE: f32 = 0.1;
/// Cap on how far ahead a lead prediction may extrapolate.
const LEAD_MAX_SECS: f32 = 3.0;
/// Subject speeds below this are treated as stationary.
const LEAD_MIN_SPEED_SQ: f32 = 0.01;

/// How the chase selects its goal position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChaseHow {
    /// Predict the subject's future position from its velocity.
    Lead,
    /// Target the subject's current position, or the center of its last
    /// known navigable area when it is off-mesh.
    Direct,
}

/// The moving entity being pursued.
#[derive(Copy, Clone, Debug)]
pub struct Subject {
    pub id: EntityId,
    pub pos: Vec3<f32>,
    pub vel: Vec3<f32>,
}

/// Outcome of a [`ChasePath::refresh`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChaseRefresh {
    /// A usable path is in place (possibly freshly computed).
    Ready,
    /// A timer is holding repathing back; keep following what we have.
    Waiting,
    /// Repathing is deferred while a ladder or elevator traversal is in
    /// progress.
    Deferred,
    /// The search failed; the fail backoff is now running. The owner should
    /// surface a move-to failure.
    Failed,
}

/// How far the subject may drift from the path's end before a repath is
/// warranted. Grows linearly with range so distant targets are re-verified
/// loosely and close ones strictly.
pub fn repath_tolerance(range: f32) -> f32 { MIN_TOLERANCE + TOLERANCE_RATE * range }

#[derive(Clone, Debug)]
pub struct ChasePath {
    follower: PathFollower,
    how: ChaseHow,
    subject: Option<EntityId>,
    last_subject_area: Option<AreaId>,
    fail_timer: CountdownTimer,
    throttle: CountdownTimer,
    /// 0 = paths never expire from age alone.
    lifetime: f32,
}

impl ChasePath {
    pub fn new(how: ChaseHow) -> Self {
        Self {
            follower: PathFollower::default(),
            how,
            subject: None,
            last_subject_area: None,
            fail_timer: CountdownTimer::default(),
            throttle: CountdownTimer::default(),
            lifetime: 0.0,
        }
    }

    /// Bound each computed path's lifetime, forcing periodic freshness.
    pub fn with_lifetime(mut self, secs: f32) -> Self {
        self.lifetime = secs;
        self
    }

    pub fn is_valid(&self) -> bool { self.follower.is_valid() }

    pub fn end_pos(&self) -> Option<Vec3<f32>> { self.follower.end_pos() }

    pub fn invalidate(&mut self) {
        self.follower.invalidate();
        self.subject = None;
    }

    /// Advance along the held path.
    pub fn update(&mut self, limits: &Locomotion, pos: Vec3<f32>) -> Option<PathProgress> {
        self.follower.update(limits, pos)
    }

    /// Where to aim for the subject under the chase mode.
    pub fn predict(
        &self,
        graph: &dyn NavGraph,
        agent_pos: Vec3<f32>,
        subject: &Subject,
        limits: &Locomotion,
    ) -> Vec3<f32> {
        match self.how {
            ChaseHow::Direct => {
                if graph.area_at(subject.pos).is_some() {
                    subject.pos
                } else {
                    // Off-mesh subject: head for the center of wherever we
                    // last saw it on the mesh.
                    self.last_subject_area
                        .map(|area| graph.area_center(area))
                        .unwrap_or(subject.pos)
                }
            },
            ChaseHow::Lead => {
                if subject.vel.magnitude_squared() < LEAD_MIN_SPEED_SQ {
                    return subject.pos;
                }
                // Closure-rate estimate: how long we need to cover the
                // current range at our run speed bounds the extrapolation.
                let range = agent_pos.distance(subject.pos);
                let lead = (range / limits.run_speed.max(0.1)).min(LEAD_MAX_SECS);
                subject.pos + subject.vel * lead
            },
        }
    }

    /// Whether the held path no longer ends close enough to the subject.
    pub fn is_repath_needed(&self, agent_pos: Vec3<f32>, subject_pos: Vec3<f32>) -> bool {
        let Some(end) = self.follower.end_pos() else {
            return true;
        };
        end.distance(subject_pos) > repath_tolerance(agent_pos.distance(subject_pos))
    }

    /// Decide whether a re-plan is warranted and perform it. Cheap when
    /// nothing needs doing; the owner calls this every tick.
    pub fn refresh(
        &mut self,
        graph: &dyn NavGraph,
        limits: &Locomotion,
        agent_pos: Vec3<f32>,
        subject: &Subject,
        cost: &dyn EdgeCost,
        now: Time,
        predicted: Option<Vec3<f32>>,
    ) -> ChaseRefresh {
        // Mid-ladder or mid-elevator, the path we are on is the only way
        // forward; all repathing waits for the traversal to finish.
        if limits.on_ladder || limits.on_elevator {
            return ChaseRefresh::Deferred;
        }

        if let Some(area) = graph.area_at(subject.pos) {
            self.last_subject_area = Some(area);
        }

        if self.lifetime > 0.0 && self.follower.is_expired(now) {
            trace!("chase path aged out");
            self.follower.invalidate();
        }

        if !self.fail_timer.is_elapsed(now) {
            return ChaseRefresh::Waiting;
        }

        let subject_changed = self.subject != Some(subject.id);
        let need = subject_changed
            || !self.follower.is_valid()
            || self.is_repath_needed(agent_pos, subject.pos);
        if !need {
            return ChaseRefresh::Ready;
        }

        // A valid path chasing the same subject is re-planned at most once
        // per throttle interval, however much the subject twitches.
        if self.follower.is_valid() && !subject_changed && !self.throttle.is_elapsed(now) {
            return ChaseRefresh::Waiting;
        }

        let goal = predicted.unwrap_or_else(|| self.predict(graph, agent_pos, subject, limits));
        self.subject = Some(subject.id);
        self.throttle.start(now, REPATH_THROTTLE);
        if self.follower.compute(graph, limits, agent_pos, goal, cost, None) {
            if self.lifetime > 0.0 {
                self.follower.expire_at(now, self.lifetime);
            }
            self.fail_timer.invalidate();
            ChaseRefresh::Ready
        } else {
            let range = agent_pos.distance(subject.pos);
            self.fail_timer.start(now, FAIL_BACKOFF_RATE * range);
            trace!(?subject.id, range, "chase repath failed, backing off");
            ChaseRefresh::Failed
        }
    }

    /// Melee-style short circuit: if a straight line to the predicted subject
    /// position is traversable with no climb discontinuity, skip pathing
    /// entirely and return the direct bearing. Any held path is stale at that
    /// point and is discarded.
    pub fn direct_dash(
        &mut self,
        world: &dyn WorldQuery,
        limits: &Locomotion,
        from: Vec3<f32>,
        predicted: Vec3<f32>,
    ) -> Option<Vec3<f32>> {
        let climb = predicted.z - from.z > limits.step_height;
        if !climb && world.is_line_traversable(from, predicted, TraverseWhen::Immediately) {
            self.follower.invalidate();
            Some(predicted - from)
        } else {
            None
        }
    }
}
