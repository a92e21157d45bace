//! # page-turner - Game-controller page turning for touchscreen readers
//!
//! Maps discrete button presses from a gamepad or joystick to synthetic tap
//! gestures near the left or right screen edge, making sure taps are never
//! issued faster than the display can execute them.
//!
//! ## Architecture
//!
//! - [`input`] - Raw key events, the action classifier and the input service
//! - [`gate`] - Feature gate backed by the host settings store
//! - [`geometry`] - Cached screen geometry
//! - [`dispatch`] - Single-flight, last-writer-wins gesture dispatcher actor
//! - [`executor`] - Gesture executor seam and a simulated executor
//! - [`latency`] - Input-to-dispatch and dispatch-to-complete latency samples
//! - [`session`] - Wiring of all of the above for one host service session
//! - [`config`] - Tap placement, watchdog and settings keys
//! - [`error`] - Centralized error types

pub mod config;
pub mod error;

pub mod gate;
pub mod geometry;
pub mod input;

pub mod dispatch;
pub mod executor;
pub mod latency;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{PageTurnerError, Result};

pub use config::Config;
pub use dispatch::{DispatcherHandle, DispatcherPhase, DispatcherSnapshot, GestureDispatcher};
pub use executor::{GestureExecutor, GestureHandle, GestureOutcome, GestureRequest};
pub use input::{classify, Action, RawInputEvent};
pub use session::PageTurnerSession;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
