//! Pickup collection. One node covers health kits, ammo boxes and carryable
//! props; the prop variant equips the carry tool for the duration and is
//! guaranteed to release it however the node leaves the stack.

use crate::{
    consts::SCAVENGE_SEARCH_RANGE,
    controller::ControlEvent,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{Behavior, Decision, EventOutcome},
    util,
};
use common::{
    cost::{RouteCost, RouteKind},
    path::{PathFollower, PathProgress},
    world::{Pickup, PickupKind},
};

pub struct Scavenge {
    kind: PickupKind,
    target: Option<Pickup>,
    path: PathFollower,
    carrying_tool: bool,
}

impl Scavenge {
    fn new(kind: PickupKind) -> Self {
        Self {
            kind,
            target: None,
            path: PathFollower::default(),
            carrying_tool: false,
        }
    }

    pub fn health() -> Self { Self::new(PickupKind::Health) }

    pub fn ammo() -> Self { Self::new(PickupKind::Ammo) }

    pub fn prop() -> Self { Self::new(PickupKind::Prop) }
}

impl Behavior for Scavenge {
    fn name(&self) -> &'static str {
        match self.kind {
            PickupKind::Health => "GetHealth",
            PickupKind::Ammo => "GetAmmo",
            PickupKind::Prop => "GetProp",
        }
    }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        let kind = self.kind;
        let found = ctx.scavenge.probe(ctx.frame, kind, || {
            ctx.world.nearest_pickup(kind, ctx.body.pos, SCAVENGE_SEARCH_RANGE)
        });
        let Some(pickup) = found else {
            return Decision::Done("nothing to scavenge");
        };
        let cost = RouteCost::new(
            RouteKind::Default,
            ctx.limits,
            ctx.body.team,
            ctx.agent,
            ctx.time,
        );
        if !self.path.compute(
            ctx.graph,
            ctx.limits,
            ctx.body.pos,
            pickup.pos,
            &cost,
            None,
        ) {
            return Decision::Done("pickup unreachable");
        }
        if self.kind == PickupKind::Prop {
            ctx.controller.push_event(ControlEvent::EquipTool);
            self.carrying_tool = true;
        }
        self.target = Some(pickup);
        Decision::Continue
    }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        // The need may have been met some other way while en route.
        match self.kind {
            PickupKind::Health if ctx.body.health >= ctx.body.max_health => {
                return Decision::Done("healthy again");
            },
            PickupKind::Ammo if ctx.body.ammo >= ctx.body.max_ammo => {
                return Decision::Done("ammo already full");
            },
            PickupKind::Prop if ctx.body.has_required_tool => {
                return Decision::Done("tool already in hand");
            },
            _ => {},
        }
        let Some(pickup) = self.target else {
            return Decision::Done("nothing to scavenge");
        };
        if !ctx.world.entity_exists(pickup.id) {
            return Decision::Done("pickup taken by someone else");
        }
        match self.path.update(ctx.limits, ctx.body.pos) {
            Some(PathProgress::Moving(bearing)) => {
                util::steer(ctx.controller, ctx.limits, bearing);
                Decision::Continue
            },
            Some(PathProgress::Stuck) => Decision::Done("pickup unreachable"),
            Some(PathProgress::GoalReached) | None => {
                ctx.controller.push_event(ControlEvent::PickUp(pickup.id));
                Decision::Done("scavenged")
            },
        }
    }

    fn on_end(&mut self, ctx: &mut BehaviorCtx) {
        // Runs on completion and on collateral unwind alike, so an
        // interrupted prop run never leaves the carry tool stuck out.
        if self.carrying_tool {
            ctx.controller.push_event(ControlEvent::ReleaseTool);
            self.carrying_tool = false;
        }
    }

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            AgentEvent::Stuck | AgentEvent::MoveToFailure(_) => {
                EventOutcome::Consume(Decision::Done("pickup unreachable"))
            },
            _ => EventOutcome::Pass,
        }
    }
}
