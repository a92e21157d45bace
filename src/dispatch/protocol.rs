//! Messages accepted by the dispatcher actor.

use crate::executor::{GestureHandle, GestureOutcome};
use crate::input::Action;
use std::time::Instant;
use tokio::sync::oneshot;

/// Commands sent to the dispatcher actor by the input service and the executor.
#[derive(Debug)]
pub enum DispatchCommand {
    /// A classified button press.
    Request { action: Action, received_at: Instant },
    /// The executor finished (or cancelled) an issued gesture.
    GestureFinished {
        handle: GestureHandle,
        outcome: GestureOutcome,
        at: Instant,
    },
    /// Report the current dispatcher state.
    Snapshot(oneshot::Sender<DispatcherSnapshot>),
    Shutdown,
}

/// Observable dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherPhase {
    Idle,
    InFlight,
    InFlightWithPending,
}

/// Point-in-time view of the dispatcher, returned for `Snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherSnapshot {
    pub phase: DispatcherPhase,
    pub pending: Option<Action>,
    pub in_flight: Option<GestureHandle>,
    /// Gestures issued since the session started.
    pub issued: u64,
}
