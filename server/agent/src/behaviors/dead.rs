//! Terminal nodes. A dead agent lingers as a corpse for a while, deaf to
//! every event, then asks the world to remove it.

use crate::{
    consts::CORPSE_DURATION,
    controller::ControlEvent,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{Behavior, Decision, EventOutcome},
};
use common::timer::CountdownTimer;

#[derive(Default)]
pub struct Dead {
    corpse: CountdownTimer,
}

impl Behavior for Dead {
    fn name(&self) -> &'static str { "Dead" }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        ctx.controller.reset();
        self.corpse.start(ctx.time, CORPSE_DURATION);
        Decision::Continue
    }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        if self.corpse.is_elapsed(ctx.time) {
            Decision::ChangeTo(Box::new(Despawn::default()), "corpse expired")
        } else {
            Decision::Continue
        }
    }

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, _event: &AgentEvent) -> EventOutcome {
        // The dead take no orders and feel no pain.
        EventOutcome::Consume(Decision::Continue)
    }
}

#[derive(Default)]
pub struct Despawn;

impl Behavior for Despawn {
    fn name(&self) -> &'static str { "Despawn" }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        ctx.controller.push_event(ControlEvent::Despawn);
        Decision::Continue
    }

    fn update(&mut self, _ctx: &mut BehaviorCtx) -> Decision {
        // Waiting for the world to delete the entity.
        Decision::Continue
    }

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, _event: &AgentEvent) -> EventOutcome {
        EventOutcome::Consume(Decision::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[test]
    fn corpse_expires_into_despawn() {
        let mut harness = Harness::new();
        let mut node = Dead::default();
        {
            let mut ctx = harness.ctx();
            node.on_start(&mut ctx);
            assert!(matches!(node.update(&mut ctx), Decision::Continue));
        }
        harness.advance(CORPSE_DURATION + 0.1);
        let mut ctx = harness.ctx();
        match node.update(&mut ctx) {
            Decision::ChangeTo(next, _) => assert_eq!(next.name(), "Despawn"),
            other => panic!("expected despawn, got {other:?}"),
        }
    }

    #[test]
    fn corpses_consume_every_event() {
        let mut harness = Harness::new();
        let mut ctx = harness.ctx();
        let mut node = Dead::default();
        node.on_start(&mut ctx);
        for event in [
            AgentEvent::Stuck,
            AgentEvent::Killed,
            AgentEvent::Command("retreat".into()),
        ] {
            assert!(matches!(
                node.on_event(&mut ctx, &event),
                EventOutcome::Consume(Decision::Continue)
            ));
        }
    }
}
