//! Stock behavior nodes. [`tactical::TacticalMonitor`] is the root every
//! agent is seeded with; the rest are pushed above it (or inside its
//! contained stack) as the situation develops.

pub mod attack;
pub mod dead;
pub mod retreat;
pub mod scavenge;
pub mod seek;
pub mod tactical;

pub use attack::{Attack, MeleeAttack};
pub use dead::{Dead, Despawn};
pub use retreat::RetreatToCover;
pub use scavenge::Scavenge;
pub use seek::SeekAndDestroy;
pub use tactical::TacticalMonitor;
