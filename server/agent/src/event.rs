//! Events delivered to agents by the surrounding game systems. Events are
//! queued on the agent's inbox and dispatched through the behavior stack at
//! the start of the next tick, innermost node first.

use common::{
    nav::AreaId,
    world::EntityId,
};

#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    /// The movement layer reports no progress along the current path.
    Stuck,
    /// Physical contact with another entity.
    Contact(EntityId),
    Injured {
        attacker: Option<EntityId>,
        amount: f32,
    },
    /// This agent died. Carried state becomes meaningless after this.
    Killed,
    /// Some other entity died.
    OtherKilled(EntityId),
    /// The movement layer reached the requested destination.
    MoveToSuccess,
    MoveToFailure(MoveFailReason),
    /// The agent crossed from one navigation area into another.
    NavAreaChanged { from: AreaId, to: AreaId },
    /// Free-form order from a commander or debug console.
    Command(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveFailReason {
    NoPath,
    Blocked,
}
