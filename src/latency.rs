//! Per-gesture latency tracking.
//!
//! Intervals are raw deltas with no clamping or smoothing. A sample whose
//! timestamps arrive out of order simply carries a negative interval.

use log::debug;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

/// Intervals measured for one finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySample {
    pub input_to_dispatch_ms: i64,
    pub dispatch_to_complete_ms: i64,
}

/// Timestamps for the gesture currently in flight.
#[derive(Debug, Default)]
pub struct LatencyRecorder {
    input_at: Option<Instant>,
    dispatched_at: Option<Instant>,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input arrival of the action about to be dispatched.
    pub fn on_input_received(&mut self, at: Instant) {
        self.input_at = Some(at);
    }

    pub fn on_dispatch_issued(&mut self, at: Instant) {
        self.dispatched_at = Some(at);
    }

    /// Close the current interval pair. Returns `None` when nothing was dispatched.
    pub fn on_completed(&mut self, at: Instant) -> Option<LatencySample> {
        let dispatched_at = self.dispatched_at.take()?;
        let input_at = self.input_at.take().unwrap_or(dispatched_at);
        Some(LatencySample {
            input_to_dispatch_ms: signed_millis(dispatched_at, input_at),
            dispatch_to_complete_ms: signed_millis(at, dispatched_at),
        })
    }

    /// Forget any half-recorded interval (dispatch abandoned).
    pub fn reset(&mut self) {
        self.input_at = None;
        self.dispatched_at = None;
    }
}

fn signed_millis(later: Instant, earlier: Instant) -> i64 {
    match later.checked_duration_since(earlier) {
        Some(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        None => -i64::try_from(earlier.duration_since(later).as_millis()).unwrap_or(i64::MAX),
    }
}

/// Observability sink for latency samples.
pub trait LatencySink: Send {
    fn record(&mut self, sample: LatencySample);
}

/// Writes every sample to the debug log.
#[derive(Debug, Default)]
pub struct LogSink;

impl LatencySink for LogSink {
    fn record(&mut self, sample: LatencySample) {
        debug!(
            "latency input->dispatch={}ms, dispatch->complete={}ms",
            sample.input_to_dispatch_ms, sample.dispatch_to_complete_ms
        );
    }
}

/// Logs each sample and forwards it to a channel.
pub struct ChannelSink {
    tx: UnboundedSender<LatencySample>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<LatencySample>) -> Self {
        Self { tx }
    }
}

impl LatencySink for ChannelSink {
    fn record(&mut self, sample: LatencySample) {
        LogSink.record(sample);
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(sample);
    }
}
