//! Agent AI: the behavior stack, the stock behavior nodes, and the per-agent
//! state the server ticks. Navigation primitives (path following, chase
//! paths, route costing) live in `skirmish-common`; this crate decides what
//! the agent is trying to do and drives the controller accordingly.

pub mod behaviors;
pub mod consts;
pub mod controller;
pub mod data;
pub mod event;
pub mod stack;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
