//! Shared helpers for the stock behaviors.

use crate::{
    behaviors::attack::{Attack, MeleeAttack},
    controller::{Controller, InputKind},
    data::{BehaviorCtx, BodyState},
    stack::Behavior,
};
use common::{nav::Locomotion, path::PathProgress, world::EntityId};
use rand::Rng;
use vek::*;

/// Translate a path bearing into controller intent.
pub fn steer(controller: &mut Controller, limits: &Locomotion, bearing: Vec3<f32>) {
    controller.inputs.move_dir = bearing.xy().try_normalized().unwrap_or_default();
    controller.inputs.move_z = bearing.z.clamp(-1.0, 1.0);
    if bearing.z > limits.step_height {
        controller.push_basic_input(InputKind::Jump);
    }
}

/// Steer along path progress; returns false once the path is finished or
/// unusable.
pub fn follow(controller: &mut Controller, limits: &Locomotion, progress: PathProgress) -> bool {
    match progress {
        PathProgress::Moving(bearing) => {
            steer(controller, limits, bearing);
            true
        },
        PathProgress::GoalReached | PathProgress::Stuck => false,
    }
}

pub fn look_at(controller: &mut Controller, target: Vec3<f32>) {
    controller.inputs.look_target = Some(target);
}

/// Default stuck recovery: hop while strafing in a random direction, to
/// shake loose from geometry the path planner cannot see.
pub fn stuck_nudge(ctx: &mut BehaviorCtx) {
    let angle = ctx.rng.gen_range(0.0..std::f32::consts::TAU);
    ctx.controller.inputs.move_dir = Vec2::new(angle.cos(), angle.sin());
    ctx.controller.push_basic_input(InputKind::Jump);
}

/// The attack node matching the agent's armament.
pub fn attack_node(body: &BodyState, target: EntityId) -> Box<dyn Behavior> {
    if body.melee_only {
        Box::new(MeleeAttack::new(target))
    } else {
        Box::new(Attack::new(target))
    }
}
