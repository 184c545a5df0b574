//! Scripted one-shot fault injection.
//!
//! A test arms a fault (or a lifecycle event) against a named operation;
//! the next and only the next matching call consumes it, so scripted
//! outcomes never leak into subsequent calls. Armed entries live in an
//! explicit FIFO queue rather than self-clearing fields, and consumption
//! follows strict precedence: fault > start-event > normal completion.
//!
//! Consumption is clear-before-deliver: the entry leaves the queue before
//! the caller ever sees it. A delivery callback that reenters the same
//! operation therefore takes the normal path instead of looping on the
//! same armed fault.

use std::collections::VecDeque;
use tracing::debug;

/// A pre-armed, one-shot override for a single operation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Deliver this error code to the operation's error callback.
    Fault(String),
    /// Deliver this lifecycle event (e.g. "start") instead of a fault.
    Event(String),
}

impl Scripted {
    /// Create a fault entry.
    #[must_use]
    pub fn fault(code: impl Into<String>) -> Self {
        Self::Fault(code.into())
    }

    /// Create a lifecycle-event entry.
    #[must_use]
    pub fn event(name: impl Into<String>) -> Self {
        Self::Event(name.into())
    }

    /// Whether this entry is a fault.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// FIFO queue of armed one-shot overrides, keyed by operation name.
#[derive(Debug, Clone, Default)]
pub struct FaultQueue {
    armed: VecDeque<(String, Scripted)>,
}

impl FaultQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm an override for the next call of `operation`.
    pub fn arm(&mut self, operation: impl Into<String>, scripted: Scripted) {
        let operation = operation.into();
        debug!(%operation, ?scripted, "arming scripted override");
        self.armed.push_back((operation, scripted));
    }

    /// Consume the override for `operation`, if any is armed.
    ///
    /// Faults win over events: the earliest armed fault for the operation
    /// is taken first even if an event was armed before it. Among entries
    /// of the same kind, consumption is FIFO.
    pub fn take(&mut self, operation: &str) -> Option<Scripted> {
        let index = self
            .armed
            .iter()
            .position(|(op, s)| op == operation && s.is_fault())
            .or_else(|| self.armed.iter().position(|(op, _)| op == operation))?;

        // Removed before delivery so reentrant callbacks see an empty slot.
        let (op, scripted) = self.armed.remove(index)?;
        debug!(operation = %op, ?scripted, "consuming scripted override");
        Some(scripted)
    }

    /// Whether any override is armed for `operation`.
    #[must_use]
    pub fn is_armed(&self, operation: &str) -> bool {
        self.armed.iter().any(|(op, _)| op == operation)
    }

    /// Total armed entries across all operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.armed.len()
    }

    /// Whether nothing is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    /// Drop every armed entry.
    pub fn clear(&mut self) {
        self.armed.clear();
    }
}
