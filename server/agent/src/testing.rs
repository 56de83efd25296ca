//! Shared mocks and a context harness for behavior tests.

use crate::{
    controller::Controller,
    data::{BehaviorCtx, BodyState, ScavengeCache},
};
use common::{
    cost::{Edge, EdgeCost},
    nav::{AreaId, Locomotion, NavGraph, PathResult, Team, ThreatExposure, Traverse, Waypoint},
    resources::{DeltaTime, Time},
    world::{EntityId, Perception, Pickup, PickupKind, Threat, TraverseWhen, WorldQuery},
};
use hashbrown::{HashMap, HashSet};
use rand::{rngs::SmallRng, SeedableRng};
use std::{cell::Cell, collections::VecDeque};
use vek::*;

/// Flat square grid of 1m walkable cells, searched breadth-first.
pub struct GridGraph {
    pub side: i32,
    pub blocked: HashSet<AreaId>,
}

impl GridGraph {
    pub fn new(side: i32) -> Self {
        Self {
            side,
            blocked: HashSet::default(),
        }
    }

    fn cell(&self, area: AreaId) -> Vec2<i32> {
        Vec2::new(area.0 as i32 % self.side, area.0 as i32 / self.side)
    }

    fn area(&self, cell: Vec2<i32>) -> Option<AreaId> {
        ((0..self.side).contains(&cell.x) && (0..self.side).contains(&cell.y))
            .then(|| AreaId((cell.y * self.side + cell.x) as u32))
    }
}

impl NavGraph for GridGraph {
    fn area_at(&self, pos: Vec3<f32>) -> Option<AreaId> {
        self.area(Vec2::new(pos.x.floor() as i32, pos.y.floor() as i32))
            .filter(|area| !self.blocked.contains(area))
    }

    fn area_center(&self, area: AreaId) -> Vec3<f32> {
        let cell = self.cell(area);
        Vec3::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5, 0.0)
    }

    fn height_change(&self, _from: AreaId, _to: AreaId) -> f32 { 0.0 }

    fn is_blocked(&self, area: AreaId, _team: Team) -> bool { self.blocked.contains(&area) }

    fn custom_cost_mult(&self, _area: AreaId) -> f32 { 1.0 }

    fn adjacent(&self, area: AreaId) -> Vec<(AreaId, f32)> {
        let cell = self.cell(area);
        [Vec2::unit_x(), -Vec2::unit_x(), Vec2::unit_y(), -Vec2::unit_y()]
            .into_iter()
            .filter_map(|step| self.area(cell + step))
            .filter(|next| !self.blocked.contains(next))
            .map(|next| (next, 1.0))
            .collect()
    }

    fn find_path(
        &self,
        _limits: &Locomotion,
        start: AreaId,
        goal: Vec3<f32>,
        cost: &dyn EdgeCost,
        max_length: Option<f32>,
    ) -> PathResult {
        let Some(goal_area) = self.area_at(goal) else {
            return PathResult::NoPath;
        };
        let mut parent: HashMap<AreaId, AreaId> = HashMap::default();
        let mut open = VecDeque::from([(start, 0.0f32)]);
        let mut found = start == goal_area;
        while let Some((area, travelled)) = open.pop_front() {
            if found {
                break;
            }
            for (next, length) in self.adjacent(area) {
                if parent.contains_key(&next) || next == start {
                    continue;
                }
                if max_length.is_some_and(|max| travelled + length > max) {
                    continue;
                }
                parent.insert(next, area);
                if next == goal_area {
                    found = true;
                    break;
                }
                open.push_back((next, travelled + length));
            }
        }
        if !found {
            return PathResult::NoPath;
        }

        let mut areas = vec![goal_area];
        while let Some(&prev) = parent.get(areas.last().unwrap_or(&goal_area)) {
            areas.push(prev);
        }
        if *areas.last().unwrap_or(&goal_area) != start {
            areas.push(start);
        }
        areas.reverse();

        let mut waypoints = Vec::with_capacity(areas.len());
        let mut prev: Option<AreaId> = None;
        let mut prev_cost = 0.0;
        for area in areas {
            let edge = Edge {
                to: area,
                from: prev,
                how: Traverse::Walk,
                length: if prev.is_some() { 1.0 } else { 0.0 },
                prev_cost,
            };
            let Some(c) = cost.edge_cost(self, &edge) else {
                return PathResult::NoPath;
            };
            prev_cost = c;
            waypoints.push(Waypoint {
                area,
                pos: self.area_center(area),
                how: Traverse::Walk,
                cost_so_far: c,
            });
            prev = Some(area);
        }
        PathResult::Complete(waypoints)
    }
}

/// World stub: optional sight-blocking wall, pickups, and a counter for the
/// expensive nearest-pickup search.
#[derive(Default)]
pub struct MockWorld {
    pub pickups: Vec<(PickupKind, Pickup)>,
    pub missing: HashSet<EntityId>,
    /// When set, sight lines crossing this x plane are blocked.
    pub wall_x: Option<f32>,
    pub searches: Cell<u32>,
}

impl WorldQuery for MockWorld {
    fn line_of_sight(&self, from: Vec3<f32>, to: Vec3<f32>) -> bool {
        match self.wall_x {
            Some(wall) => (from.x - wall) * (to.x - wall) > 0.0,
            None => true,
        }
    }

    fn line_of_fire(&self, _from: Vec3<f32>, target: EntityId) -> bool {
        !self.missing.contains(&target)
    }

    fn is_line_traversable(&self, from: Vec3<f32>, to: Vec3<f32>, _when: TraverseWhen) -> bool {
        self.line_of_sight(from, to)
    }

    fn nearest_pickup(&self, kind: PickupKind, from: Vec3<f32>, max_range: f32) -> Option<Pickup> {
        self.searches.set(self.searches.get() + 1);
        self.pickups
            .iter()
            .filter(|(k, p)| *k == kind && !self.missing.contains(&p.id))
            .map(|(_, p)| *p)
            .filter(|p| p.pos.distance(from) <= max_range)
            .min_by(|a, b| a.pos.distance(from).total_cmp(&b.pos.distance(from)))
    }

    fn entity_exists(&self, id: EntityId) -> bool { !self.missing.contains(&id) }
}

#[derive(Default)]
pub struct MockPerception {
    pub threats: Vec<Threat>,
    pub visible: HashSet<EntityId>,
    pub last_known: HashMap<EntityId, Vec3<f32>>,
}

impl Perception for MockPerception {
    fn primary_known_threat(&self, _agent: EntityId) -> Option<Threat> {
        self.threats.first().copied()
    }

    fn known_threats(&self, _agent: EntityId) -> Vec<Threat> { self.threats.clone() }

    fn is_visible_recently(&self, _agent: EntityId, threat: EntityId) -> bool {
        self.visible.contains(&threat)
    }

    fn last_known_position(&self, _agent: EntityId, threat: EntityId) -> Option<Vec3<f32>> {
        self.last_known.get(&threat).copied().or_else(|| {
            self.threats
                .iter()
                .find(|t| t.id == threat)
                .map(|t| t.pos)
        })
    }
}

pub struct NoExposure;

impl ThreatExposure for NoExposure {
    fn danger_at(&self, _area: AreaId) -> f32 { 0.0 }
}

/// Owns one of everything a [`BehaviorCtx`] borrows.
pub struct Harness {
    pub graph: GridGraph,
    pub world: MockWorld,
    pub perception: MockPerception,
    pub exposure: NoExposure,
    pub body: BodyState,
    pub limits: Locomotion,
    pub controller: Controller,
    pub scavenge: ScavengeCache,
    pub rng: SmallRng,
    pub time: Time,
    pub dt: DeltaTime,
    pub frame: u64,
}

impl Harness {
    pub fn new() -> Self {
        let mut harness = Self::isolated();
        harness.graph = GridGraph::new(32);
        harness
    }

    /// A single walkable cell: nowhere to path to, nowhere to hide.
    pub fn isolated() -> Self {
        Self {
            graph: GridGraph::new(1),
            world: MockWorld::default(),
            perception: MockPerception::default(),
            exposure: NoExposure,
            body: BodyState {
                pos: Vec3::new(0.5, 0.5, 0.0),
                ..BodyState::default()
            },
            limits: Locomotion::default(),
            controller: Controller::default(),
            scavenge: ScavengeCache::default(),
            rng: SmallRng::seed_from_u64(0xB07),
            time: Time(0.0),
            dt: DeltaTime(0.1),
            frame: 1,
        }
    }

    pub fn ctx(&mut self) -> BehaviorCtx<'_> {
        BehaviorCtx {
            agent: EntityId(1),
            body: &self.body,
            limits: &self.limits,
            graph: &self.graph,
            world: &self.world,
            perception: &self.perception,
            exposure: &self.exposure,
            controller: &mut self.controller,
            scavenge: &mut self.scavenge,
            rng: &mut self.rng,
            time: self.time,
            dt: self.dt,
            frame: self.frame,
        }
    }

    pub fn advance(&mut self, secs: f32) {
        self.time.0 += secs as f64;
        self.frame += 1;
    }
}
