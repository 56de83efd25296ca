//! Output side of the agent: behaviors write movement, button presses and
//! control events here each tick, and the surrounding game systems drain it.

use common::world::EntityId;
use hashbrown::HashSet;
use vek::*;

/// Continuous movement intent for this tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct ControllerInputs {
    /// Desired planar movement direction, normalized or zero.
    pub move_dir: Vec2<f32>,
    /// Vertical intent in [-1, 1] (ladders, elevators).
    pub move_z: f32,
    pub look_target: Option<Vec3<f32>>,
}

/// A button the agent can hold this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Fire,
    Melee,
    Jump,
    Reload,
    SpecialAbility,
    DetonateTraps,
}

/// One-shot commands to the surrounding game systems.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    PickUp(EntityId),
    EquipTool,
    ReleaseTool,
    Despawn,
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    pub inputs: ControllerInputs,
    pressed: HashSet<InputKind>,
    events: Vec<ControlEvent>,
}

impl Controller {
    /// Clear per-tick intent. Queued control events survive until drained.
    pub fn reset(&mut self) {
        self.inputs = ControllerInputs::default();
        self.pressed.clear();
    }

    pub fn push_basic_input(&mut self, input: InputKind) { self.pressed.insert(input); }

    pub fn is_pressed(&self, input: InputKind) -> bool { self.pressed.contains(&input) }

    pub fn push_event(&mut self, event: ControlEvent) { self.events.push(event); }

    pub fn events(&self) -> &[ControlEvent] { &self.events }

    pub fn take_events(&mut self) -> Vec<ControlEvent> { std::mem::take(&mut self.events) }
}
