//! Input service.
//!
//! Feature gate, classifier and dispatcher forwarding in one call per key event.

use crate::dispatch::DispatcherHandle;
use crate::gate::FeatureGate;
use crate::input::classify::classify;
use crate::input::raw::RawInputEvent;
use log::{trace, warn};

/// Turns host key events into dispatcher requests.
#[derive(Clone)]
pub struct InputService {
    gate: FeatureGate,
    dispatcher: DispatcherHandle,
}

impl InputService {
    pub fn new(gate: FeatureGate, dispatcher: DispatcherHandle) -> Self {
        Self { gate, dispatcher }
    }

    /// Handle one key transition.
    ///
    /// Returns true when the event was turned into a page-turn request and the
    /// host should consume the key.
    pub fn handle_key_event(&self, event: &RawInputEvent) -> bool {
        if !self.gate.is_enabled() {
            return false;
        }

        let Some(action) = classify(event) else {
            trace!(
                "ignoring key {} phase {:?} source {:#x}",
                event.key_code,
                event.phase,
                event.source.bits()
            );
            return false;
        };

        match self.dispatcher.request(action, event.timestamp) {
            Ok(()) => true,
            Err(err) => {
                warn!("dropping {action:?}: {err}");
                false
            }
        }
    }

    pub fn gate(&self) -> &FeatureGate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsConfig;
    use crate::dispatch::{self, DispatchCommand};
    use crate::gate::{MemorySettings, SettingsStore};
    use crate::input::raw::{keycode, KeyPhase, SourceFlags};
    use crate::input::Action;
    use std::sync::Arc;
    use std::time::Instant;

    fn service(host_available: bool) -> (
        InputService,
        Arc<MemorySettings>,
        tokio::sync::mpsc::UnboundedReceiver<DispatchCommand>,
    ) {
        let store = Arc::new(MemorySettings::new(host_available));
        let gate = FeatureGate::new(store.clone(), SettingsConfig::default());
        let (handle, rx) = dispatch::channel();
        (InputService::new(gate, handle), store, rx)
    }

    #[test]
    fn forwards_classified_presses() {
        let (service, _, mut rx) = service(true);
        let event = RawInputEvent::gamepad_down(keycode::BUTTON_A);

        assert!(service.handle_key_event(&event));
        match rx.try_recv().unwrap() {
            DispatchCommand::Request {
                action,
                received_at,
            } => {
                assert_eq!(action, Action::Right);
                assert_eq!(received_at, event.timestamp);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ignored_events_are_not_consumed() {
        let (service, _, mut rx) = service(true);
        let now = Instant::now();
        let events = [
            RawInputEvent::new(SourceFlags::GAMEPAD, keycode::BUTTON_A, KeyPhase::Up, now),
            RawInputEvent::new(SourceFlags::KEYBOARD, keycode::BUTTON_A, KeyPhase::Down, now),
            RawInputEvent::new(SourceFlags::GAMEPAD, 62, KeyPhase::Down, now),
        ];

        for event in &events {
            assert!(!service.handle_key_event(event));
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disabled_gate_forwards_nothing() {
        let (service, store, mut rx) = service(true);
        store.set_bool("page_turner_enabled", false);

        assert!(!service.handle_key_event(&RawInputEvent::gamepad_down(keycode::DPAD_LEFT)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn missing_host_capability_forwards_nothing() {
        let (service, _, mut rx) = service(false);
        assert!(!service.handle_key_event(&RawInputEvent::gamepad_down(keycode::DPAD_LEFT)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_dispatcher_is_not_consumed() {
        let (service, _, rx) = service(true);
        drop(rx);
        assert!(!service.handle_key_event(&RawInputEvent::gamepad_down(keycode::BUTTON_Y)));
    }
}
