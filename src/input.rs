//! Input subsystem.
//!
//! Raw key transitions come in from the host, pass the feature gate, get
//! classified into page-turn actions and are forwarded to the dispatcher.

pub mod classify;
pub mod raw;
pub mod service;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::input` rather than reaching into submodules.
pub use classify::{action_for_key, classify, Action};
pub use raw::{keycode, KeyPhase, RawInputEvent, SourceFlags};
pub use service::InputService;
