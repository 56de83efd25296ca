//! Path follower: holds one computed path and drives movement along it.

use crate::{
    cost::EdgeCost,
    nav::{Locomotion, NavGraph, PathResult, Waypoint},
    resources::Time,
    timer::CountdownTimer,
};
use vek::*;

/// Distance to a waypoint at which it counts as visited.
const NODE_TOLERANCE: f32 = 1.5;
/// Vertical slack when deciding a waypoint is reached.
const NODE_HEIGHT_SLACK: f32 = 2.0;
/// Locomotion-reported no-progress duration that counts as stuck.
const STUCK_SECS: f32 = 1.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PathState {
    #[default]
    Invalid,
    Valid,
    GoalReached,
}

/// What following the path produced this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathProgress {
    /// Keep moving along the given bearing (not normalized).
    Moving(Vec3<f32>),
    GoalReached,
    /// Locomotion reports no progress; the owning behavior decides whether
    /// to nudge, repath, or give up.
    Stuck,
}

/// Owns one computed path. Paths are never shared between agents; whichever
/// behavior computed the path holds the follower.
#[derive(Clone, Debug, Default)]
pub struct PathFollower {
    waypoints: Vec<Waypoint>,
    next_idx: usize,
    state: PathState,
    complete: bool,
    goal: Vec3<f32>,
    deadline: CountdownTimer,
}

impl PathFollower {
    pub fn state(&self) -> PathState { self.state }

    pub fn is_valid(&self) -> bool { self.state == PathState::Valid }

    /// The position this path actually ends at (for a partial path, short of
    /// the requested goal).
    pub fn end_pos(&self) -> Option<Vec3<f32>> {
        self.waypoints.last().map(|wp| wp.pos)
    }

    /// The goal the path was computed toward.
    pub fn goal(&self) -> Vec3<f32> { self.goal }

    pub fn is_complete(&self) -> bool { self.complete }

    pub fn invalidate(&mut self) {
        self.waypoints.clear();
        self.next_idx = 0;
        self.state = PathState::Invalid;
        self.complete = false;
        self.deadline.invalidate();
    }

    /// Bound the path's lifetime; once elapsed it is stale even if still
    /// geometrically fine.
    pub fn expire_at(&mut self, now: Time, lifetime: f32) {
        self.deadline.start(now, lifetime);
    }

    pub fn is_expired(&self, now: Time) -> bool {
        self.deadline.has_started() && self.deadline.is_elapsed(now)
    }

    /// Ask the graph for a new path toward `goal`. Returns whether the
    /// follower now holds a usable path. A partial path is accepted and
    /// followed to its end; the owner re-plans from there.
    pub fn compute(
        &mut self,
        graph: &dyn NavGraph,
        limits: &Locomotion,
        from: Vec3<f32>,
        goal: Vec3<f32>,
        cost: &dyn EdgeCost,
        max_length: Option<f32>,
    ) -> bool {
        self.invalidate();
        let Some(start) = graph.area_at(from) else {
            return false;
        };
        match graph.find_path(limits, start, goal, cost, max_length) {
            PathResult::Complete(waypoints) => {
                self.waypoints = waypoints;
                self.complete = true;
            },
            PathResult::Partial(waypoints) if !waypoints.is_empty() => {
                self.waypoints = waypoints;
                self.complete = false;
            },
            _ => return false,
        }
        self.goal = goal;
        self.state = PathState::Valid;
        true
    }

    /// Advance along the path from `pos`. `None` when there is no valid path
    /// to follow.
    pub fn update(&mut self, limits: &Locomotion, pos: Vec3<f32>) -> Option<PathProgress> {
        if self.state != PathState::Valid {
            return None;
        }

        if limits.stuck_duration > STUCK_SECS {
            return Some(PathProgress::Stuck);
        }

        loop {
            let Some(wp) = self.waypoints.get(self.next_idx) else {
                self.state = PathState::GoalReached;
                return Some(PathProgress::GoalReached);
            };
            let reached = pos.xy().distance_squared(wp.pos.xy()) < NODE_TOLERANCE.powi(2)
                && (pos.z - wp.pos.z).abs() < NODE_HEIGHT_SLACK;
            if reached {
                self.next_idx += 1;
            } else {
                return Some(PathProgress::Moving(wp.pos - pos));
            }
        }
    }
}
