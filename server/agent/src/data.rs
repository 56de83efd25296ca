//! Per-agent state and the context handed to behavior nodes.

use crate::{
    behaviors::tactical::TacticalMonitor,
    controller::Controller,
    event::AgentEvent,
    stack::ActionStack,
};
use common::{
    nav::{Locomotion, NavGraph, Team, ThreatExposure},
    resources::{DeltaTime, Time},
    world::{EntityId, Perception, Pickup, PickupKind, WorldQuery},
};
use hashbrown::HashMap;
use rand::RngCore;
use std::collections::VecDeque;
use tracing::trace;
use vek::*;

/// Physical and equipment state of an agent's body, reported by the
/// surrounding game systems each tick.
#[derive(Clone, Debug)]
pub struct BodyState {
    pub pos: Vec3<f32>,
    pub vel: Vec3<f32>,
    pub health: f32,
    pub max_health: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub is_reloading: bool,
    pub team: Team,
    /// Agent has no ranged weapon at all.
    pub melee_only: bool,
    pub has_required_tool: bool,
    pub special_ability_ready: bool,
    /// Enemies currently standing on traps this agent placed.
    pub enemies_on_sticky_traps: u32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            pos: Vec3::zero(),
            vel: Vec3::zero(),
            health: 100.0,
            max_health: 100.0,
            ammo: 30,
            max_ammo: 30,
            is_reloading: false,
            team: Team::default(),
            melee_only: false,
            has_required_tool: true,
            special_ability_ready: false,
            enemies_on_sticky_traps: 0,
        }
    }
}

impl BodyState {
    pub fn health_fraction(&self) -> f32 { self.health / self.max_health.max(1.0) }

    pub fn ammo_fraction(&self) -> f32 { self.ammo as f32 / self.max_ammo.max(1) as f32 }
}

/// Per-tick cache of the expensive nearest-pickup searches, so several
/// scavenge decisions within one tick share a single world query per pickup
/// kind.
#[derive(Clone, Debug, Default)]
pub struct ScavengeCache {
    frame: u64,
    entries: HashMap<PickupKind, Option<Pickup>>,
}

impl ScavengeCache {
    /// Look up the cached result for this kind, running `search` only on the
    /// first probe of a given kind within a frame.
    pub fn probe(
        &mut self,
        frame: u64,
        kind: PickupKind,
        search: impl FnOnce() -> Option<Pickup>,
    ) -> Option<Pickup> {
        if frame != self.frame {
            self.entries.clear();
            self.frame = frame;
        }
        *self.entries.entry(kind).or_insert_with(search)
    }
}

/// Read-only views onto the external systems the AI consumes.
#[derive(Copy, Clone)]
pub struct WorldView<'a> {
    pub graph: &'a dyn NavGraph,
    pub world: &'a dyn WorldQuery,
    pub perception: &'a dyn Perception,
    pub exposure: &'a dyn ThreatExposure,
}

/// Everything a behavior node can see and touch during one call.
pub struct BehaviorCtx<'a> {
    pub agent: EntityId,
    pub body: &'a BodyState,
    pub limits: &'a Locomotion,
    pub graph: &'a dyn NavGraph,
    pub world: &'a dyn WorldQuery,
    pub perception: &'a dyn Perception,
    pub exposure: &'a dyn ThreatExposure,
    pub controller: &'a mut Controller,
    pub scavenge: &'a mut ScavengeCache,
    pub rng: &'a mut dyn RngCore,
    pub time: Time,
    pub dt: DeltaTime,
    pub frame: u64,
}

/// One AI-driven entity: its behavior stack, pending events and per-tick
/// caches.
pub struct Agent {
    id: EntityId,
    stack: ActionStack,
    inbox: VecDeque<AgentEvent>,
    scavenge: ScavengeCache,
}

impl Agent {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            stack: ActionStack::default(),
            inbox: VecDeque::new(),
            scavenge: ScavengeCache::default(),
        }
    }

    pub fn id(&self) -> EntityId { self.id }

    /// Queue an event for dispatch at the start of the next tick.
    pub fn inject(&mut self, event: AgentEvent) { self.inbox.push_back(event); }

    pub fn active_behavior(&self) -> Option<&'static str> { self.stack.active_name() }

    /// One AI step: drain the inbox through the stack, then run the active
    /// node. On the first tick the stack is seeded with the monitor.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        view: &WorldView<'_>,
        body: &BodyState,
        limits: &Locomotion,
        controller: &mut Controller,
        rng: &mut dyn RngCore,
        time: Time,
        dt: DeltaTime,
        frame: u64,
    ) {
        // Events injected while dispatch runs are deferred to the next tick,
        // so one tick processes a fixed snapshot.
        let events: Vec<AgentEvent> = self.inbox.drain(..).collect();
        let mut ctx = BehaviorCtx {
            agent: self.id,
            body,
            limits,
            graph: view.graph,
            world: view.world,
            perception: view.perception,
            exposure: view.exposure,
            controller,
            scavenge: &mut self.scavenge,
            rng,
            time,
            dt,
            frame,
        };
        if self.stack.is_empty() {
            self.stack.seed(&mut ctx, Box::new(TacticalMonitor::default()));
        }
        for event in &events {
            if !self.stack.dispatch(&mut ctx, event) {
                trace!(?event, "event fell through the stack");
            }
        }
        self.stack.tick(&mut ctx);
    }
}
