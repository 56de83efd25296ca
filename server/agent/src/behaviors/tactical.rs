//! The root node. Never completes on its own; it owns a contained stack for
//! ordinary combat flow and overrides it with survival and housekeeping
//! concerns.

use crate::{
    behaviors::{dead::{Dead, Despawn}, retreat::RetreatToCover, scavenge::Scavenge, seek::SeekAndDestroy},
    consts::*,
    controller::InputKind,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{ActionStack, Behavior, Decision, EventOutcome},
};
use common::timer::CountdownTimer;

#[derive(Default)]
pub struct TacticalMonitor {
    contained: ActionStack,
    maintenance: CountdownTimer,
    retreat_backoff: CountdownTimer,
}

impl Behavior for TacticalMonitor {
    fn name(&self) -> &'static str { "TacticalMonitor" }

    fn active_name(&self) -> &'static str {
        self.contained.active_name().unwrap_or_else(|| self.name())
    }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        self.contained.seed(ctx, Box::new(SeekAndDestroy::default()));
        Decision::Continue
    }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        let threat = ctx.perception.primary_known_threat(ctx.agent);
        let threat_visible = threat
            .map_or(false, |t| ctx.perception.is_visible_recently(ctx.agent, t.id));

        if ctx.body.special_ability_ready && threat_visible {
            ctx.controller.push_basic_input(InputKind::SpecialAbility);
        }

        if threat.is_some()
            && ctx.body.health_fraction() < RETREAT_HEALTH_FRACTION
            && self.retreat_backoff.is_elapsed(ctx.time)
        {
            self.retreat_backoff.start(ctx.time, RETREAT_RETRY_BACKOFF);
            return Decision::SuspendFor(Box::new(RetreatToCover::default()), "health critical");
        }

        // Housekeeping only happens out of contact.
        if !threat_visible && self.maintenance.is_elapsed(ctx.time) {
            self.maintenance.start(ctx.time, MAINTENANCE_INTERVAL);
            if ctx.body.health_fraction() < HURT_HEALTH_FRACTION {
                return Decision::SuspendFor(Box::new(Scavenge::health()), "patching up");
            }
            if ctx.body.ammo_fraction() < LOW_AMMO_FRACTION {
                return Decision::SuspendFor(Box::new(Scavenge::ammo()), "ammo low");
            }
            if !ctx.body.has_required_tool {
                return Decision::SuspendFor(Box::new(Scavenge::prop()), "missing tool");
            }
        }

        if ctx.body.enemies_on_sticky_traps > 0 {
            ctx.controller.push_basic_input(InputKind::DetonateTraps);
        }

        self.contained.tick(ctx);
        Decision::Continue
    }

    fn on_suspend(&mut self, ctx: &mut BehaviorCtx) { self.contained.suspend_active(ctx); }

    fn on_resume(&mut self, ctx: &mut BehaviorCtx) { self.contained.resume_active(ctx); }

    fn on_end(&mut self, ctx: &mut BehaviorCtx) { self.contained.clear(ctx); }

    fn on_event(&mut self, ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            AgentEvent::Killed => {
                EventOutcome::Consume(Decision::ChangeTo(Box::new(Dead::default()), "killed"))
            },
            AgentEvent::Command(order) => match order.as_str() {
                "retreat" => EventOutcome::Consume(Decision::SuspendFor(
                    Box::new(RetreatToCover::default()),
                    "ordered to retreat",
                )),
                "despawn" => EventOutcome::Consume(Decision::ChangeTo(
                    Box::new(Despawn::default()),
                    "ordered to despawn",
                )),
                _ => EventOutcome::Pass,
            },
            // Anything else gets a chance at the contained combat flow.
            _ => {
                if self.contained.dispatch(ctx, event) {
                    EventOutcome::Consume(Decision::Continue)
                } else {
                    EventOutcome::Pass
                }
            },
        }
    }
}
