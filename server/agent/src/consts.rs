//! Tuning constants for the stock behaviors.

/// Health fraction below which the monitor forces a retreat to cover.
pub const RETREAT_HEALTH_FRACTION: f32 = 0.35;
/// Minimum gap between two forced retreats, so a coverless map does not spin
/// the monitor.
pub const RETREAT_RETRY_BACKOFF: f32 = 5.0;

/// How often the monitor considers housekeeping (health, ammo, tools).
pub const MAINTENANCE_INTERVAL: f32 = 5.0;
/// Health fraction below which a quiet moment is spent finding a health kit.
pub const HURT_HEALTH_FRACTION: f32 = 0.8;
pub const LOW_AMMO_FRACTION: f32 = 0.25;

pub const SCAVENGE_SEARCH_RANGE: f32 = 60.0;

pub const ATTACK_RANGE: f32 = 25.0;
/// Seconds without a sighting before a ranged attack gives up.
pub const ATTACK_GIVE_UP_SECS: f32 = 10.0;
/// Attack chase paths are re-planned at least this often even when the
/// geometry still checks out, since a fleeing target invalidates assumptions.
pub const ATTACK_PATH_LIFETIME: f32 = 4.0;

pub const MELEE_RANGE: f32 = 2.0;
/// Beyond this a melee-only agent stops pressing the chase.
pub const MELEE_GIVE_UP_RANGE: f32 = 20.0;

/// Travel budget, in meters, for the breadth-first cover search.
pub const COVER_SEARCH_BUDGET: f32 = 40.0;
/// The cover search keeps only this many nearest candidates before picking.
pub const COVER_CANDIDATES: usize = 10;
pub const COVER_HOLD_MIN: f32 = 3.0;
pub const COVER_HOLD_MAX: f32 = 8.0;

/// How far from its current position an idle agent roams.
pub const ROAM_RANGE: f32 = 30.0;

/// How long a corpse lingers before despawning.
pub const CORPSE_DURATION: f32 = 10.0;
