//! Gesture dispatcher state machine.
//!
//! At most one gesture is in flight. Presses that arrive meanwhile overwrite a
//! single pending slot, so a burst collapses to the latest intent. The pending
//! slot is only ever occupied while a gesture is in flight.

use crate::config::TapConfig;
use crate::dispatch::protocol::{DispatcherPhase, DispatcherSnapshot};
use crate::error::Result;
use crate::executor::{GestureExecutor, GestureHandle, GestureOutcome, GestureRequest};
use crate::geometry::{GeometryCache, ScreenGeometry};
use crate::input::Action;
use crate::latency::{LatencyRecorder, LatencySink};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

/// Result of [`GestureDispatcher::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A tap was issued right away.
    Issued(GestureHandle),
    /// A gesture is in flight; the action now occupies the pending slot.
    Coalesced { replaced: Option<Action> },
    /// Geometry or the executor failed; nothing was issued.
    Abandoned,
}

/// Result of [`GestureDispatcher::on_gesture_finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Back to idle.
    Idle,
    /// The pending action was issued as a new gesture.
    Promoted(GestureHandle),
    /// The handle did not match the gesture in flight and was ignored.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    handle: GestureHandle,
    issued_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct PendingAction {
    action: Action,
    received_at: Instant,
}

/// Compute the tap for `action` on a screen of the given size.
pub fn tap_request(tap: &TapConfig, action: Action, geometry: ScreenGeometry) -> GestureRequest {
    let ratio = match action {
        Action::Left => tap.edge_ratio_left,
        Action::Right => tap.edge_ratio_right,
    };
    GestureRequest {
        x: geometry.width * ratio,
        y: geometry.height * tap.y_ratio,
        duration: tap.duration(),
        will_continue: tap.will_continue,
    }
}

pub struct GestureDispatcher {
    geometry: Arc<GeometryCache>,
    executor: Box<dyn GestureExecutor>,
    sink: Box<dyn LatencySink>,
    latency: LatencyRecorder,
    tap: TapConfig,
    in_flight: Option<InFlight>,
    pending: Option<PendingAction>,
    issued: u64,
}

impl GestureDispatcher {
    pub fn new(
        geometry: Arc<GeometryCache>,
        executor: Box<dyn GestureExecutor>,
        sink: Box<dyn LatencySink>,
        tap: TapConfig,
    ) -> Self {
        Self {
            geometry,
            executor,
            sink,
            latency: LatencyRecorder::new(),
            tap,
            in_flight: None,
            pending: None,
            issued: 0,
        }
    }

    /// Handle a classified press that arrived at `received_at`.
    pub fn request(
        &mut self,
        action: Action,
        received_at: Instant,
        now: Instant,
    ) -> RequestOutcome {
        if self.in_flight.is_some() {
            let replaced = self
                .pending
                .replace(PendingAction {
                    action,
                    received_at,
                })
                .map(|previous| previous.action);
            if let Some(previous) = replaced {
                debug!("pending {previous:?} superseded by {action:?}");
            }
            return RequestOutcome::Coalesced { replaced };
        }

        match self.start(action, received_at, now) {
            Ok(handle) => RequestOutcome::Issued(handle),
            Err(err) => {
                warn!("abandoning {action:?} tap: {err}");
                RequestOutcome::Abandoned
            }
        }
    }

    /// Handle the executor's report for `handle`.
    ///
    /// A cancellation also drops the pending action: a cancelled tap ends the
    /// current burst instead of triggering another gesture.
    pub fn on_gesture_finished(
        &mut self,
        handle: GestureHandle,
        outcome: GestureOutcome,
        now: Instant,
    ) -> FinishOutcome {
        match self.in_flight {
            Some(current) if current.handle == handle => {}
            _ => {
                warn!("ignoring {outcome:?} for gesture {handle}: not in flight");
                return FinishOutcome::Stale;
            }
        }

        self.in_flight = None;
        if let Some(sample) = self.latency.on_completed(now) {
            self.sink.record(sample);
        }

        let pending = self.pending.take();
        match (outcome, pending) {
            (GestureOutcome::Completed, Some(next)) => {
                match self.start(next.action, next.received_at, now) {
                    Ok(handle) => FinishOutcome::Promoted(handle),
                    Err(err) => {
                        warn!("abandoning pending {:?} tap: {err}", next.action);
                        FinishOutcome::Idle
                    }
                }
            }
            (GestureOutcome::Cancelled, Some(dropped)) => {
                debug!("gesture {handle} cancelled, dropping pending {:?}", dropped.action);
                FinishOutcome::Idle
            }
            (_, None) => FinishOutcome::Idle,
        }
    }

    /// Treat the in-flight gesture as cancelled (completion never arrived).
    pub fn expire(&mut self, now: Instant) -> Option<FinishOutcome> {
        let current = self.in_flight?;
        warn!(
            "no completion for gesture {} after {:?}, treating as cancelled",
            current.handle,
            now.saturating_duration_since(current.issued_at)
        );
        Some(self.on_gesture_finished(current.handle, GestureOutcome::Cancelled, now))
    }

    /// Session end: drop any pending action. No gesture is issued.
    pub fn shutdown(&mut self) {
        if let Some(dropped) = self.pending.take() {
            debug!("session ended, dropping pending {:?}", dropped.action);
        }
        self.latency.reset();
    }

    pub fn phase(&self) -> DispatcherPhase {
        match (self.in_flight, self.pending) {
            (None, _) => DispatcherPhase::Idle,
            (Some(_), None) => DispatcherPhase::InFlight,
            (Some(_), Some(_)) => DispatcherPhase::InFlightWithPending,
        }
    }

    pub fn pending_action(&self) -> Option<Action> {
        self.pending.map(|pending| pending.action)
    }

    pub fn in_flight_handle(&self) -> Option<GestureHandle> {
        self.in_flight.map(|current| current.handle)
    }

    /// When the gesture in flight was issued.
    pub fn in_flight_since(&self) -> Option<Instant> {
        self.in_flight.map(|current| current.issued_at)
    }

    pub fn snapshot(&self) -> DispatcherSnapshot {
        DispatcherSnapshot {
            phase: self.phase(),
            pending: self.pending_action(),
            in_flight: self.in_flight_handle(),
            issued: self.issued,
        }
    }

    fn start(
        &mut self,
        action: Action,
        received_at: Instant,
        now: Instant,
    ) -> Result<GestureHandle> {
        let geometry = self.geometry.resolve()?;
        let request = tap_request(&self.tap, action, geometry);
        let handle = self.executor.issue(request)?;
        debug!(
            "issued {action:?} tap {handle} at ({:.1}, {:.1})",
            request.x, request.y
        );

        self.in_flight = Some(InFlight {
            handle,
            issued_at: now,
        });
        self.latency.on_input_received(received_at);
        self.latency.on_dispatch_issued(now);
        self.issued += 1;
        Ok(handle)
    }
}
