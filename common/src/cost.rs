//! Per-edge scoring for the navigation-graph search.

use crate::{
    nav::{AreaId, Locomotion, NavGraph, Team, Traverse},
    resources::Time,
    world::EntityId,
};

/// Jump edges are slower than walking the same distance.
const JUMP_PENALTY: f32 = 2.0;
/// Ladder rungs are slower still.
const LADDER_PENALTY: f32 = 3.0;
/// Weight of the per-area danger estimate in `Safest` costing.
const DANGER_WEIGHT: f32 = 5.0;
/// Weight of the per-area danger estimate when fleeing.
const RETREAT_DANGER_WEIGHT: f32 = 10.0;
/// Width of the time bucket feeding the route-preference jitter. Within one
/// bucket an agent keeps preferring the same route; across buckets it may
/// switch.
const JITTER_BUCKET_SECS: f64 = 30.0;

/// One candidate edge offered to the cost functor by the graph search.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    pub to: AreaId,
    /// `None` for the first edge of a path (the seed).
    pub from: Option<AreaId>,
    pub how: Traverse,
    pub length: f32,
    /// Accumulated cost of the path up to `from`.
    pub prev_cost: f32,
}

/// Cost functor consumed by [`NavGraph::find_path`]. Returns the accumulated
/// cost through this edge, or `None` to reject the edge entirely.
pub trait EdgeCost {
    fn edge_cost(&self, graph: &dyn NavGraph, edge: &Edge) -> Option<f32>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RouteKind {
    /// Everyday movement: jittered so identical agents spread over several
    /// equally good routes instead of beelining down one.
    #[default]
    Default,
    /// Avoid exposed areas, weighting cost by the danger estimate.
    Safest,
    /// Shortest travel time, no jitter.
    Fastest,
    /// Fleeing: danger dominates everything else.
    Retreat,
}

/// The standard cost functor: locomotion-limit rejection, jump/ladder
/// penalties, route-preference weighting.
pub struct RouteCost<'a> {
    kind: RouteKind,
    limits: &'a Locomotion,
    team: Team,
    agent: EntityId,
    bucket: u64,
    exposure: Option<&'a dyn crate::nav::ThreatExposure>,
}

impl<'a> RouteCost<'a> {
    pub fn new(kind: RouteKind, limits: &'a Locomotion, team: Team, agent: EntityId, now: Time) -> Self {
        Self {
            kind,
            limits,
            team,
            agent,
            bucket: (now.0 / JITTER_BUCKET_SECS).floor() as u64,
            exposure: None,
        }
    }

    pub fn with_exposure(mut self, exposure: &'a dyn crate::nav::ThreatExposure) -> Self {
        self.exposure = Some(exposure);
        self
    }
}

/// Deterministic route-preference multiplier in `[1.0, 2.0)`.
///
/// We use FxHash because we don't care about DoS resistance and we want the
/// value to be stable across compiles and runs, which replay and the cost
/// memoization in the graph search both rely on.
pub fn route_jitter(agent: EntityId, area: AreaId, bucket: u64) -> f32 {
    let h = fxhash::hash64(&(agent.0, area.0, bucket));
    // Top 24 bits as a fraction keeps the full hash entropy we need while
    // staying exactly representable in f32.
    1.0 + (h >> 40) as f32 / (1u64 << 24) as f32
}

impl EdgeCost for RouteCost<'_> {
    fn edge_cost(&self, graph: &dyn NavGraph, edge: &Edge) -> Option<f32> {
        // Seed edge: the start area itself costs nothing.
        let Some(from) = edge.from else {
            return Some(0.0);
        };

        if graph.is_blocked(edge.to, self.team) {
            return None;
        }

        let rise = graph.height_change(from, edge.to);
        if rise > self.limits.max_jump_height {
            return None;
        }
        if -rise > self.limits.max_drop_height {
            return None;
        }

        let mut mult = match edge.how {
            Traverse::Ladder => LADDER_PENALTY,
            _ => 1.0,
        };
        // Climbs above step height need a jump, which is slower than walking.
        if rise > self.limits.step_height {
            mult *= JUMP_PENALTY;
        }

        let danger = self.exposure.map_or(0.0, |e| e.danger_at(edge.to));
        match self.kind {
            RouteKind::Default => {
                mult *= route_jitter(self.agent, edge.to, self.bucket);
            },
            RouteKind::Safest => {
                mult *= route_jitter(self.agent, edge.to, self.bucket);
                mult *= 1.0 + danger * DANGER_WEIGHT;
            },
            RouteKind::Fastest => {},
            RouteKind::Retreat => {
                mult *= 1.0 + danger * RETREAT_DANGER_WEIGHT;
            },
        }

        let cost = edge.length * mult * graph.custom_cost_mult(edge.to);
        Some(edge.prev_cost + cost)
    }
}
