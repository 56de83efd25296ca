//! Interface to the external navigation graph. The graph itself (areas,
//! adjacency, its search algorithm) lives outside this crate; the AI consumes
//! it through [`NavGraph`] and supplies a cost functor for the search.

use crate::cost::EdgeCost;
use vek::*;

/// Identity of one navigation area (a walkable cell of the graph).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AreaId(pub u32);

/// Faction an agent belongs to, used by area traversability flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Team(pub u8);

/// How an edge between two areas is traversed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Traverse {
    #[default]
    Walk,
    Jump,
    Ladder,
    Elevator,
}

/// One step of a computed path, with the search's accumulated cost up to and
/// including this step.
#[derive(Copy, Clone, Debug)]
pub struct Waypoint {
    pub area: AreaId,
    pub pos: Vec3<f32>,
    pub how: Traverse,
    pub cost_so_far: f32,
}

/// Outcome of a navigation-graph search.
#[derive(Clone, Debug)]
pub enum PathResult {
    /// The path reaches the goal.
    Complete(Vec<Waypoint>),
    /// The search ran out of budget; the path ends short of the goal.
    Partial(Vec<Waypoint>),
    NoPath,
}

/// Locomotion limits and current locomotion state of an agent, reported by
/// the external movement layer.
#[derive(Copy, Clone, Debug)]
pub struct Locomotion {
    pub step_height: f32,
    pub max_jump_height: f32,
    pub max_drop_height: f32,
    pub run_speed: f32,
    /// How long the movement layer has failed to make progress, in seconds.
    pub stuck_duration: f32,
    pub on_ladder: bool,
    pub on_elevator: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            step_height: 0.5,
            max_jump_height: 1.5,
            max_drop_height: 4.0,
            run_speed: 6.0,
            stuck_duration: 0.0,
            on_ladder: false,
            on_elevator: false,
        }
    }
}

/// Query interface onto the navigation graph.
pub trait NavGraph {
    fn area_at(&self, pos: Vec3<f32>) -> Option<AreaId>;

    fn area_center(&self, area: AreaId) -> Vec3<f32>;

    /// Floor height gained walking `from → to`. Negative when dropping.
    fn height_change(&self, from: AreaId, to: AreaId) -> f32;

    /// Whether the area is flagged non-traversable for the given team.
    fn is_blocked(&self, area: AreaId, team: Team) -> bool;

    /// Area-level custom cost multiplier (1.0 when unset).
    fn custom_cost_mult(&self, area: AreaId) -> f32;

    /// Outgoing edges of an area, with edge lengths. Used for local
    /// exploration (cover search), not for long-range pathing.
    fn adjacent(&self, area: AreaId) -> Vec<(AreaId, f32)>;

    /// Run the graph search from `start` toward `goal`, scoring every edge
    /// with `cost`. `max_length` bounds the total path length when given.
    fn find_path(
        &self,
        limits: &Locomotion,
        start: AreaId,
        goal: Vec3<f32>,
        cost: &dyn EdgeCost,
        max_length: Option<f32>,
    ) -> PathResult;
}

/// Per-area danger estimate supplied by the threat-tracking layer, consumed
/// by safest-route costing.
pub trait ThreatExposure {
    /// 0.0 = no known exposure, rising with expected danger.
    fn danger_at(&self, area: AreaId) -> f32;
}
