//! Single-flight gesture dispatch.
//!
//! [`state::GestureDispatcher`] is the synchronous state machine; the actor in
//! [`worker`] owns one instance and serialises button requests and executor
//! completions through a single channel.

pub mod protocol;
pub mod state;
pub mod worker;

pub use protocol::{DispatchCommand, DispatcherPhase, DispatcherSnapshot};
pub use state::{tap_request, FinishOutcome, GestureDispatcher, RequestOutcome};
pub use worker::{channel, dispatcher_loop, DispatcherHandle};
