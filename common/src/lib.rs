//! Shared foundation for the bot AI: time resources, throttling timers, the
//! navigation-graph interface, per-edge route costing, and the path
//! follower / chase-path planners that behaviors drive movement with.

pub mod chase;
pub mod cost;
pub mod nav;
pub mod path;
pub mod resources;
pub mod timer;
pub mod world;
