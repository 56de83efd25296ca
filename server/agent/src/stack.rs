//! The behavior stack: a last-in-first-out stack of behavior nodes where only
//! the innermost node runs each tick. Outer nodes are suspended, not gone;
//! they resume when everything above them completes, and they still get a
//! look at incoming events.

use crate::{data::BehaviorCtx, event::AgentEvent};
use std::fmt;
use tracing::debug;

/// Hard ceiling on nesting. Hitting it means a behavior is pushing children
/// in a loop.
const MAX_DEPTH: usize = 16;

/// What a node wants to happen after running.
pub enum Decision {
    /// Keep running next tick.
    Continue,
    /// Pop this node and push a replacement in its place.
    ChangeTo(Box<dyn Behavior>, &'static str),
    /// Keep this node on the stack, suspended, and run the child until it
    /// completes.
    SuspendFor(Box<dyn Behavior>, &'static str),
    /// Pop this node; the node below resumes.
    Done(&'static str),
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "Continue"),
            Self::ChangeTo(node, reason) => write!(f, "ChangeTo({}, {reason:?})", node.name()),
            Self::SuspendFor(node, reason) => write!(f, "SuspendFor({}, {reason:?})", node.name()),
            Self::Done(reason) => write!(f, "Done({reason:?})"),
        }
    }
}

/// A node's response to a dispatched event.
pub enum EventOutcome {
    /// Not interested; offer the event to the node below.
    Pass,
    /// Handle the event here and stop propagation. The decision is applied at
    /// this node's position, unwinding anything stacked above it.
    Consume(Decision),
}

pub trait Behavior {
    fn name(&self) -> &'static str;

    /// Name of the logically active node, descending into contained stacks.
    fn active_name(&self) -> &'static str { self.name() }

    /// Runs once when the node is pushed. May immediately redirect.
    fn on_start(&mut self, _ctx: &mut BehaviorCtx) -> Decision { Decision::Continue }

    fn update(&mut self, ctx: &mut BehaviorCtx) -> Decision;

    /// A child was pushed above this node.
    fn on_suspend(&mut self, _ctx: &mut BehaviorCtx) {}

    /// The last child above this node completed.
    fn on_resume(&mut self, _ctx: &mut BehaviorCtx) {}

    /// Runs exactly once when the node leaves the stack, whether it finished
    /// or was unwound by a decision below it. Cleanup goes here.
    fn on_end(&mut self, _ctx: &mut BehaviorCtx) {}

    fn on_event(&mut self, _ctx: &mut BehaviorCtx, _event: &AgentEvent) -> EventOutcome {
        EventOutcome::Pass
    }
}

#[derive(Default)]
pub struct ActionStack {
    stack: Vec<Box<dyn Behavior>>,
}

impl ActionStack {
    pub fn is_empty(&self) -> bool { self.stack.is_empty() }

    pub fn depth(&self) -> usize { self.stack.len() }

    pub fn active_name(&self) -> Option<&'static str> {
        self.stack.last().map(|node| node.active_name())
    }

    /// Install the root node of an empty stack.
    pub fn seed(&mut self, ctx: &mut BehaviorCtx, root: Box<dyn Behavior>) {
        debug_assert!(self.stack.is_empty(), "seeding a non-empty behavior stack");
        self.push(ctx, root);
    }

    /// Run the innermost node once.
    pub fn tick(&mut self, ctx: &mut BehaviorCtx) {
        let Some(top) = self.stack.len().checked_sub(1) else {
            return;
        };
        let decision = self.stack[top].update(ctx);
        self.apply(ctx, top, decision);
    }

    /// Offer an event to every node, innermost first, until one consumes it.
    /// Returns whether it was consumed.
    pub fn dispatch(&mut self, ctx: &mut BehaviorCtx, event: &AgentEvent) -> bool {
        for idx in (0..self.stack.len()).rev() {
            match self.stack[idx].on_event(ctx, event) {
                EventOutcome::Consume(decision) => {
                    self.apply(ctx, idx, decision);
                    return true;
                },
                EventOutcome::Pass => {},
            }
        }
        false
    }

    /// Notify the innermost node that something outside this stack suspended
    /// it. Used by composite nodes that carry a contained stack.
    pub fn suspend_active(&mut self, ctx: &mut BehaviorCtx) {
        if let Some(node) = self.stack.last_mut() {
            node.on_suspend(ctx);
        }
    }

    pub fn resume_active(&mut self, ctx: &mut BehaviorCtx) {
        if let Some(node) = self.stack.last_mut() {
            node.on_resume(ctx);
        }
    }

    /// Unwind everything, running each node's `on_end` innermost first.
    pub fn clear(&mut self, ctx: &mut BehaviorCtx) {
        while !self.stack.is_empty() {
            self.pop(ctx);
        }
    }

    fn push(&mut self, ctx: &mut BehaviorCtx, node: Box<dyn Behavior>) {
        debug_assert!(self.stack.len() < MAX_DEPTH, "behavior stack runaway");
        debug!(node = node.name(), depth = self.stack.len(), "behavior started");
        self.stack.push(node);
        let top = self.stack.len() - 1;
        let decision = self.stack[top].on_start(ctx);
        self.apply(ctx, top, decision);
    }

    /// Apply a decision made by the node at `idx`. A decision from a buried
    /// node (event handling) first unwinds every node stacked above it.
    fn apply(&mut self, ctx: &mut BehaviorCtx, idx: usize, decision: Decision) {
        match decision {
            Decision::Continue => {},
            Decision::Done(reason) => {
                self.unwind_above(ctx, idx);
                self.pop(ctx);
                debug!(reason, "behavior done");
                if let Some(parent) = self.stack.last_mut() {
                    parent.on_resume(ctx);
                }
            },
            Decision::ChangeTo(next, reason) => {
                self.unwind_above(ctx, idx);
                self.pop(ctx);
                debug!(reason, next = next.name(), "behavior changed");
                self.push(ctx, next);
            },
            Decision::SuspendFor(next, reason) => {
                self.unwind_above(ctx, idx);
                if let Some(node) = self.stack.last_mut() {
                    node.on_suspend(ctx);
                }
                debug!(reason, next = next.name(), "behavior suspended");
                self.push(ctx, next);
            },
        }
    }

    fn unwind_above(&mut self, ctx: &mut BehaviorCtx, idx: usize) {
        while self.stack.len() > idx + 1 {
            self.pop(ctx);
        }
    }

    fn pop(&mut self, ctx: &mut BehaviorCtx) {
        if let Some(mut node) = self.stack.pop() {
            node.on_end(ctx);
        }
    }
}
