//! Interfaces onto the game world and the perception subsystem. Both are
//! external collaborators; the AI only ever sees them through these traits.

use vek::*;

/// Identity of a game entity (agent, threat, pickup, prop).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Policy for traversability tests against movable obstacles: can the line be
/// crossed right now, or after breaking/opening what is in the way.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraverseWhen {
    Immediately,
    Eventually,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Health,
    Ammo,
    Prop,
}

/// A scavengeable object in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pickup {
    pub id: EntityId,
    pub pos: Vec3<f32>,
}

/// Trace and object queries against the game world.
pub trait WorldQuery {
    fn line_of_sight(&self, from: Vec3<f32>, to: Vec3<f32>) -> bool;

    /// Clear line of fire from a muzzle position to an entity's hull.
    fn line_of_fire(&self, from: Vec3<f32>, target: EntityId) -> bool;

    /// Whether an agent could move in a straight line between the two
    /// positions, under the given obstacle policy.
    fn is_line_traversable(&self, from: Vec3<f32>, to: Vec3<f32>, when: TraverseWhen) -> bool;

    /// Nearest pickup of the given kind reachable from `from`, within
    /// `max_range`. This is the expensive search the scavenge behaviors
    /// cache per tick.
    fn nearest_pickup(&self, kind: PickupKind, from: Vec3<f32>, max_range: f32) -> Option<Pickup>;

    /// Whether the entity still exists in the world.
    fn entity_exists(&self, id: EntityId) -> bool;
}

/// A hostile entity the agent currently perceives or recently perceived.
#[derive(Copy, Clone, Debug)]
pub struct Threat {
    pub id: EntityId,
    pub pos: Vec3<f32>,
    pub vel: Vec3<f32>,
}

/// Interface onto the vision/memory subsystem that produces known threats.
pub trait Perception {
    /// The most dangerous threat the agent currently knows about.
    fn primary_known_threat(&self, agent: EntityId) -> Option<Threat>;

    /// All threats the agent currently knows about.
    fn known_threats(&self, agent: EntityId) -> Vec<Threat>;

    fn is_visible_recently(&self, agent: EntityId, threat: EntityId) -> bool;

    fn last_known_position(&self, agent: EntityId, threat: EntityId) -> Option<Vec3<f32>>;
}
