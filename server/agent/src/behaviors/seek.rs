//! Default combat flow: hunt known threats, engage on sight, roam otherwise.

use crate::{
    consts::ROAM_RANGE,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{Behavior, Decision, EventOutcome},
    util,
};
use common::{
    chase::{ChaseHow, ChasePath, Subject},
    cost::{RouteCost, RouteKind},
    path::{PathFollower, PathProgress},
};
use rand::Rng;
use vek::*;

pub struct SeekAndDestroy {
    hunt: ChasePath,
    roam: PathFollower,
}

impl Default for SeekAndDestroy {
    fn default() -> Self {
        Self {
            hunt: ChasePath::new(ChaseHow::Direct),
            roam: PathFollower::default(),
        }
    }
}

impl Behavior for SeekAndDestroy {
    fn name(&self) -> &'static str { "SeekAndDestroy" }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        if let Some(threat) = ctx.perception.primary_known_threat(ctx.agent) {
            if ctx.perception.is_visible_recently(ctx.agent, threat.id) {
                return Decision::SuspendFor(
                    util::attack_node(ctx.body, threat.id),
                    "threat sighted",
                );
            }
            // Not seen right now: close in on wherever it was last known.
            let aim = ctx
                .perception
                .last_known_position(ctx.agent, threat.id)
                .unwrap_or(threat.pos);
            let subject = Subject {
                id: threat.id,
                pos: aim,
                vel: Vec3::zero(),
            };
            let cost = RouteCost::new(
                RouteKind::Safest,
                ctx.limits,
                ctx.body.team,
                ctx.agent,
                ctx.time,
            )
            .with_exposure(ctx.exposure);
            self.hunt.refresh(
                ctx.graph,
                ctx.limits,
                ctx.body.pos,
                &subject,
                &cost,
                ctx.time,
                None,
            );
            if let Some(progress) = self.hunt.update(ctx.limits, ctx.body.pos) {
                if matches!(progress, PathProgress::Stuck) {
                    self.hunt.invalidate();
                } else {
                    util::follow(ctx.controller, ctx.limits, progress);
                }
            }
            return Decision::Continue;
        }

        // Nothing known: wander.
        if !self.roam.is_valid() {
            let offset = Vec2::new(
                ctx.rng.gen_range(-ROAM_RANGE..ROAM_RANGE),
                ctx.rng.gen_range(-ROAM_RANGE..ROAM_RANGE),
            );
            let goal = ctx.body.pos + Vec3::new(offset.x, offset.y, 0.0);
            let cost = RouteCost::new(
                RouteKind::Default,
                ctx.limits,
                ctx.body.team,
                ctx.agent,
                ctx.time,
            );
            // An unlucky goal just means another roll next tick.
            self.roam
                .compute(ctx.graph, ctx.limits, ctx.body.pos, goal, &cost, Some(ROAM_RANGE * 2.0));
        }
        match self.roam.update(ctx.limits, ctx.body.pos) {
            Some(PathProgress::Moving(bearing)) => util::steer(ctx.controller, ctx.limits, bearing),
            Some(PathProgress::Stuck) => self.roam.invalidate(),
            Some(PathProgress::GoalReached) | None => {},
        }
        Decision::Continue
    }

    fn on_event(&mut self, ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            // Bumping into or being hit by an enemy overrides the hunt.
            AgentEvent::Contact(id) if ctx.world.entity_exists(*id) => EventOutcome::Consume(
                Decision::SuspendFor(util::attack_node(ctx.body, *id), "contact"),
            ),
            AgentEvent::Injured {
                attacker: Some(id), ..
            } if ctx.world.entity_exists(*id) => EventOutcome::Consume(Decision::SuspendFor(
                util::attack_node(ctx.body, *id),
                "taking fire",
            )),
            AgentEvent::MoveToFailure(_) | AgentEvent::Stuck => {
                self.hunt.invalidate();
                self.roam.invalidate();
                util::stuck_nudge(ctx);
                EventOutcome::Consume(Decision::Continue)
            },
            _ => EventOutcome::Pass,
        }
    }
}
