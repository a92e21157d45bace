//! Gesture executor seam.
//!
//! The dispatcher hands each tap to an executor and returns immediately. The
//! executor reports the result later, exactly once per issued gesture, through
//! a [`CompletionNotifier`].

use crate::dispatch::protocol::DispatchCommand;
use crate::error::{PageTurnerError, Result};
use log::debug;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Single-point tap to perform on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRequest {
    pub x: f32,
    pub y: f32,
    /// Stroke duration; the stroke starts immediately.
    pub duration: Duration,
    pub will_continue: bool,
}

/// Identifies one issued gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GestureHandle(pub u64);

impl fmt::Display for GestureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an issued gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Completed,
    Cancelled,
}

/// Host collaborator that performs gestures.
pub trait GestureExecutor: Send {
    /// Start a gesture without waiting for it to finish.
    fn issue(&mut self, request: GestureRequest) -> Result<GestureHandle>;
}

/// Reports gesture results back to the dispatcher actor.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    tx: UnboundedSender<DispatchCommand>,
}

impl CompletionNotifier {
    pub fn new(tx: UnboundedSender<DispatchCommand>) -> Self {
        Self { tx }
    }

    pub fn completed(&self, handle: GestureHandle) -> Result<()> {
        self.finish(handle, GestureOutcome::Completed)
    }

    pub fn cancelled(&self, handle: GestureHandle) -> Result<()> {
        self.finish(handle, GestureOutcome::Cancelled)
    }

    pub fn finish(&self, handle: GestureHandle, outcome: GestureOutcome) -> Result<()> {
        self.tx
            .send(DispatchCommand::GestureFinished {
                handle,
                outcome,
                at: Instant::now(),
            })
            .map_err(|_| PageTurnerError::DispatcherUnavailable)
    }
}

/// Executor that pretends to tap, finishing each gesture after a fixed delay.
pub struct SimulatedExecutor {
    notifier: CompletionNotifier,
    gesture_time: Duration,
    outcome: GestureOutcome,
    next_handle: u64,
    issued: Option<UnboundedSender<(GestureHandle, GestureRequest)>>,
}

impl SimulatedExecutor {
    pub fn new(notifier: CompletionNotifier, gesture_time: Duration) -> Self {
        Self {
            notifier,
            gesture_time,
            outcome: GestureOutcome::Completed,
            next_handle: 1,
            issued: None,
        }
    }

    /// Report every gesture with `outcome` instead of completing it.
    pub fn with_outcome(mut self, outcome: GestureOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Mirror every issued gesture onto `tx`.
    pub fn with_issue_log(mut self, tx: UnboundedSender<(GestureHandle, GestureRequest)>) -> Self {
        self.issued = Some(tx);
        self
    }
}

impl GestureExecutor for SimulatedExecutor {
    fn issue(&mut self, request: GestureRequest) -> Result<GestureHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| PageTurnerError::executor(err.to_string()))?;

        let handle = GestureHandle(self.next_handle);
        self.next_handle += 1;
        debug!(
            "simulated tap {handle} at ({:.1}, {:.1})",
            request.x, request.y
        );

        if let Some(tx) = &self.issued {
            let _ = tx.send((handle, request));
        }

        let notifier = self.notifier.clone();
        let delay = self.gesture_time;
        let outcome = self.outcome;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The session may have stopped meanwhile.
            let _ = notifier.finish(handle, outcome);
        });

        Ok(handle)
    }
}
