//! Engagement nodes. `Attack` is the ranged fight; `MeleeAttack` is the
//! all-in chase for agents without a gun.

use crate::{
    consts::*,
    controller::InputKind,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{Behavior, Decision, EventOutcome},
    util,
};
use common::{
    chase::{ChaseHow, ChasePath, ChaseRefresh, Subject},
    cost::{RouteCost, RouteKind},
    path::PathProgress,
    timer::IntervalTimer,
    world::{EntityId, Threat},
};
use vek::*;

/// Where the target is believed to be, preferring live perception over
/// memory.
fn believed_position(ctx: &BehaviorCtx, target: EntityId) -> Option<(Vec3<f32>, Vec3<f32>)> {
    let live: Option<Threat> = ctx
        .perception
        .known_threats(ctx.agent)
        .into_iter()
        .find(|t| t.id == target);
    match live {
        Some(t) => Some((t.pos, t.vel)),
        None => ctx
            .perception
            .last_known_position(ctx.agent, target)
            .map(|pos| (pos, Vec3::zero())),
    }
}

/// Stuck reports before an attack concedes the approach is hopeless.
const MAX_STUCK_REPORTS: u8 = 3;

pub struct Attack {
    target: EntityId,
    chase: ChasePath,
    last_seen: IntervalTimer,
    stuck_reports: u8,
}

impl Attack {
    pub fn new(target: EntityId) -> Self {
        Self {
            target,
            chase: ChasePath::new(ChaseHow::Lead).with_lifetime(ATTACK_PATH_LIFETIME),
            last_seen: IntervalTimer::default(),
            stuck_reports: 0,
        }
    }
}

impl Behavior for Attack {
    fn name(&self) -> &'static str { "Attack" }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        self.last_seen.reset(ctx.time);
        Decision::Continue
    }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        if !ctx.world.entity_exists(self.target) {
            return Decision::Done("target gone");
        }
        let visible = ctx.perception.is_visible_recently(ctx.agent, self.target);
        if visible {
            self.last_seen.reset(ctx.time);
        } else if self.last_seen.is_greater(ctx.time, ATTACK_GIVE_UP_SECS) {
            return Decision::Done("lost the target");
        }
        let Some((aim, vel)) = believed_position(ctx, self.target) else {
            return Decision::Done("no trace of target");
        };

        if ctx.body.ammo == 0 && !ctx.body.is_reloading {
            ctx.controller.push_basic_input(InputKind::Reload);
        }

        let range = ctx.body.pos.distance(aim);
        if visible && range <= ATTACK_RANGE && ctx.world.line_of_fire(ctx.body.pos, self.target) {
            // Stand and shoot.
            util::look_at(ctx.controller, aim);
            if ctx.body.ammo > 0 && !ctx.body.is_reloading {
                ctx.controller.push_basic_input(InputKind::Fire);
            }
            return Decision::Continue;
        }

        // Out of position: close in, leading the target.
        let subject = Subject {
            id: self.target,
            pos: aim,
            vel,
        };
        let cost = fastest_cost(ctx);
        if self.chase.refresh(
            ctx.graph,
            ctx.limits,
            ctx.body.pos,
            &subject,
            &cost,
            ctx.time,
            None,
        ) == ChaseRefresh::Failed
            && !visible
        {
            return Decision::Done("target unreachable");
        }
        if let Some(progress) = self.chase.update(ctx.limits, ctx.body.pos) {
            if matches!(progress, PathProgress::Stuck) {
                self.chase.invalidate();
            } else {
                util::follow(ctx.controller, ctx.limits, progress);
            }
        }
        Decision::Continue
    }

    fn on_event(&mut self, ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            AgentEvent::Stuck | AgentEvent::MoveToFailure(_) => {
                self.stuck_reports += 1;
                if self.stuck_reports > MAX_STUCK_REPORTS {
                    return EventOutcome::Consume(Decision::Done("hopelessly stuck"));
                }
                self.chase.invalidate();
                util::stuck_nudge(ctx);
                EventOutcome::Consume(Decision::Continue)
            },
            AgentEvent::OtherKilled(id) if *id == self.target => {
                EventOutcome::Consume(Decision::Done("target died"))
            },
            _ => EventOutcome::Pass,
        }
    }
}

fn fastest_cost<'a>(ctx: &BehaviorCtx<'a>) -> RouteCost<'a> {
    RouteCost::new(
        RouteKind::Fastest,
        ctx.limits,
        ctx.body.team,
        ctx.agent,
        ctx.time,
    )
}

pub struct MeleeAttack {
    target: EntityId,
    chase: ChasePath,
}

impl MeleeAttack {
    pub fn new(target: EntityId) -> Self {
        Self {
            target,
            chase: ChasePath::new(ChaseHow::Lead),
        }
    }
}

impl Behavior for MeleeAttack {
    fn name(&self) -> &'static str { "MeleeAttack" }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        if !ctx.world.entity_exists(self.target) {
            return Decision::Done("target gone");
        }
        let Some((aim, vel)) = believed_position(ctx, self.target) else {
            return Decision::Done("no trace of target");
        };
        let range = ctx.body.pos.distance(aim);
        if range > MELEE_GIVE_UP_RANGE {
            return Decision::Done("target out of reach");
        }
        util::look_at(ctx.controller, aim);
        if range <= MELEE_RANGE {
            ctx.controller.push_basic_input(InputKind::Melee);
            return Decision::Continue;
        }

        // Prefer a straight sprint at where the target is headed; fall back
        // to pathing around obstacles.
        let subject = Subject {
            id: self.target,
            pos: aim,
            vel,
        };
        let predicted = self.chase.predict(ctx.graph, ctx.body.pos, &subject, ctx.limits);
        if let Some(bearing) = self
            .chase
            .direct_dash(ctx.world, ctx.limits, ctx.body.pos, predicted)
        {
            util::steer(ctx.controller, ctx.limits, bearing);
            return Decision::Continue;
        }
        let cost = fastest_cost(ctx);
        self.chase.refresh(
            ctx.graph,
            ctx.limits,
            ctx.body.pos,
            &subject,
            &cost,
            ctx.time,
            Some(predicted),
        );
        if let Some(progress) = self.chase.update(ctx.limits, ctx.body.pos) {
            if matches!(progress, PathProgress::Stuck) {
                self.chase.invalidate();
            } else {
                util::follow(ctx.controller, ctx.limits, progress);
            }
        }
        Decision::Continue
    }

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            AgentEvent::OtherKilled(id) if *id == self.target => {
                EventOutcome::Consume(Decision::Done("target died"))
            },
            _ => EventOutcome::Pass,
        }
    }
}
