//! Break contact: find a nearby area no known threat can see into, move
//! there along a danger-averse route, and hold until recovered.

use crate::{
    consts::*,
    controller::InputKind,
    data::BehaviorCtx,
    event::AgentEvent,
    stack::{Behavior, Decision, EventOutcome},
    util,
};
use common::{
    cost::{RouteCost, RouteKind},
    nav::AreaId,
    path::{PathFollower, PathProgress},
    timer::CountdownTimer,
};
use hashbrown::HashSet;
use itertools::Itertools;
use rand::Rng;
use std::collections::VecDeque;
use tracing::debug;
use vek::*;

#[derive(Default)]
pub struct RetreatToCover {
    path: PathFollower,
    hold: CountdownTimer,
    cover: Option<Vec3<f32>>,
}

impl RetreatToCover {
    /// Breadth-first walk of nearby areas within the travel budget, scoring
    /// each by how many known threats can see its center. Returns the picked
    /// cover position.
    fn find_cover(&self, ctx: &mut BehaviorCtx) -> Option<Vec3<f32>> {
        let start = ctx.graph.area_at(ctx.body.pos)?;
        let threats = ctx.perception.known_threats(ctx.agent);

        let mut seen: HashSet<AreaId> = HashSet::default();
        seen.insert(start);
        let mut open: VecDeque<(AreaId, f32)> = VecDeque::from([(start, 0.0)]);
        // (area, travel distance, observing threats)
        let mut candidates: Vec<(AreaId, f32, usize)> = Vec::new();

        while let Some((area, travelled)) = open.pop_front() {
            if area != start {
                let center = ctx.graph.area_center(area);
                let watchers = threats
                    .iter()
                    .filter(|t| ctx.world.line_of_sight(t.pos, center))
                    .count();
                candidates.push((area, travelled, watchers));
            }
            for (next, length) in ctx.graph.adjacent(area) {
                let total = travelled + length;
                if total > COVER_SEARCH_BUDGET
                    || ctx.graph.is_blocked(next, ctx.body.team)
                    // Retreating is no time to attempt climbs.
                    || ctx.graph.height_change(area, next) > ctx.limits.step_height
                    || !seen.insert(next)
                {
                    continue;
                }
                open.push_back((next, total));
            }
        }

        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        // Only the nearest candidates are in the running.
        candidates.truncate(COVER_CANDIDATES);
        let pool = candidates.iter().min_set_by_key(|c| c.2);
        // Random among equals so squads spread out instead of piling up.
        let pick = pool[ctx.rng.gen_range(0..pool.len())];
        debug!(area = ?pick.0, watchers = pick.2, "cover selected");
        Some(ctx.graph.area_center(pick.0))
    }
}

impl Behavior for RetreatToCover {
    fn name(&self) -> &'static str { "RetreatToCover" }

    fn on_start(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        let Some(cover) = self.find_cover(ctx) else {
            return Decision::Done("No cover available!");
        };
        let cost = RouteCost::new(
            RouteKind::Retreat,
            ctx.limits,
            ctx.body.team,
            ctx.agent,
            ctx.time,
        )
        .with_exposure(ctx.exposure);
        if !self.path.compute(
            ctx.graph,
            ctx.limits,
            ctx.body.pos,
            cover,
            &cost,
            Some(COVER_SEARCH_BUDGET * 2.0),
        ) {
            return Decision::Done("No cover available!");
        }
        self.cover = Some(cover);
        Decision::Continue
    }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision {
        match self.path.update(ctx.limits, ctx.body.pos) {
            Some(PathProgress::Moving(bearing)) => {
                util::steer(ctx.controller, ctx.limits, bearing);
                return Decision::Continue;
            },
            Some(PathProgress::Stuck) => return Decision::Done("stuck short of cover"),
            Some(PathProgress::GoalReached) | None => {},
        }

        // In cover: top the magazine off and wait out the heat.
        if !self.hold.has_started() {
            let hold = ctx.rng.gen_range(COVER_HOLD_MIN..COVER_HOLD_MAX);
            self.hold.start(ctx.time, hold);
        }
        if ctx.body.ammo < ctx.body.max_ammo && !ctx.body.is_reloading {
            ctx.controller.push_basic_input(InputKind::Reload);
        }
        if self.hold.is_elapsed(ctx.time) && !ctx.body.is_reloading {
            return Decision::Done("recovered");
        }
        Decision::Continue
    }

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, event: &AgentEvent) -> EventOutcome {
        match event {
            // Getting hit in "cover" means the spot is no good.
            AgentEvent::Injured { .. } if self.hold.has_started() => {
                EventOutcome::Consume(Decision::Done("cover compromised"))
            },
            _ => EventOutcome::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use common::world::{EntityId, Threat};

    #[test]
    fn no_candidates_reports_no_cover() {
        let mut harness = Harness::isolated();
        let mut ctx = harness.ctx();
        let mut node = RetreatToCover::default();
        assert!(matches!(
            node.on_start(&mut ctx),
            Decision::Done("No cover available!")
        ));
    }

    #[test]
    fn cover_hides_from_known_threats() {
        let mut harness = Harness::new();
        // Sight line broken across the x = 2 plane; the threat sits beyond
        // it, so only the cells just behind the agent are unwatched.
        harness.world.wall_x = Some(2.0);
        harness.body.pos = Vec3::new(2.5, 0.5, 0.0);
        harness.perception.threats.push(Threat {
            id: EntityId(9),
            pos: Vec3::new(12.5, 0.5, 0.0),
            vel: Vec3::zero(),
        });
        let mut ctx = harness.ctx();
        let mut node = RetreatToCover::default();
        assert!(matches!(node.on_start(&mut ctx), Decision::Continue));
        let cover = node.cover.expect("cover position set");
        assert!(cover.x < 2.0, "picked a watched area at {cover:?}");
    }

    #[test]
    fn cover_pool_is_limited_to_the_nearest_areas() {
        let mut harness = Harness::new();
        // The only unwatched ground lies across the x = 10 sight wall, well
        // beyond the nearest candidates. Distant hidden ground must lose to
        // nearby partial cover.
        harness.world.wall_x = Some(10.0);
        harness.body.pos = Vec3::new(4.5, 4.5, 0.0);
        harness.perception.threats.push(Threat {
            id: EntityId(9),
            pos: Vec3::new(6.5, 4.5, 0.0),
            vel: Vec3::zero(),
        });
        let mut ctx = harness.ctx();
        let mut node = RetreatToCover::default();
        assert!(matches!(node.on_start(&mut ctx), Decision::Continue));
        let cover = node.cover.expect("cover position set");
        assert!(cover.x < 10.0, "crossed the map for cover at {cover:?}");
        assert!(cover.distance(Vec3::new(4.5, 4.5, 0.0)) < 4.0);
    }

    /// Step the body along the controller's requested direction until the
    /// node stops asking for movement (it has settled into cover).
    fn walk_into_cover(harness: &mut Harness, node: &mut RetreatToCover) {
        for _ in 0..200 {
            harness.controller.reset();
            let mut ctx = harness.ctx();
            match node.update(&mut ctx) {
                Decision::Continue => {},
                other => panic!("unexpected decision on the way to cover: {other:?}"),
            }
            let dir = harness.controller.inputs.move_dir;
            if dir == Vec2::zero() {
                return;
            }
            harness.body.pos += Vec3::new(dir.x, dir.y, 0.0) * 0.5;
        }
        panic!("never reached cover");
    }

    #[test]
    fn holds_in_cover_then_recovers() {
        let mut harness = Harness::new();
        harness.body.ammo = 5;
        let mut node = RetreatToCover::default();
        {
            let mut ctx = harness.ctx();
            assert!(matches!(node.on_start(&mut ctx), Decision::Continue));
        }
        walk_into_cover(&mut harness, &mut node);
        assert!(harness.controller.is_pressed(InputKind::Reload));

        harness.body.ammo = harness.body.max_ammo;
        harness.advance(COVER_HOLD_MAX + 0.1);
        let mut ctx = harness.ctx();
        assert!(matches!(node.update(&mut ctx), Decision::Done("recovered")));
    }

    #[test]
    fn getting_shot_in_cover_gives_it_up() {
        let mut harness = Harness::new();
        let mut node = RetreatToCover::default();
        {
            let mut ctx = harness.ctx();
            node.on_start(&mut ctx);
        }
        walk_into_cover(&mut harness, &mut node);
        let mut ctx = harness.ctx();
        let hit = AgentEvent::Injured {
            attacker: None,
            amount: 8.0,
        };
        assert!(matches!(
            node.on_event(&mut ctx, &hit),
            EventOutcome::Consume(Decision::Done("cover compromised"))
        ));
    }
}
