//! Pure mapping from raw key events to page-turn actions.

use crate::input::raw::{keycode, KeyPhase, RawInputEvent};

/// Page-turn intent produced by a recognised button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
}

/// Classify a raw event. `None` means the event is ignored.
///
/// Only key-down transitions from game-controller sources are considered.
pub fn classify(event: &RawInputEvent) -> Option<Action> {
    if event.phase != KeyPhase::Down {
        return None;
    }
    if !event.source.is_game_controller() {
        return None;
    }
    action_for_key(event.key_code)
}

/// Fixed button table shared by the left and right Joy-Con layouts.
pub fn action_for_key(key_code: i32) -> Option<Action> {
    match key_code {
        keycode::DPAD_UP | keycode::DPAD_LEFT | keycode::BUTTON_Y | keycode::BUTTON_X => {
            Some(Action::Left)
        }
        keycode::DPAD_DOWN | keycode::DPAD_RIGHT | keycode::BUTTON_A | keycode::BUTTON_B => {
            Some(Action::Right)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::raw::SourceFlags;
    use std::time::Instant;

    fn event(source: SourceFlags, key_code: i32, phase: KeyPhase) -> RawInputEvent {
        RawInputEvent::new(source, key_code, phase, Instant::now())
    }

    #[test]
    fn maps_every_bound_button() {
        let table = [
            (keycode::DPAD_UP, Action::Left),
            (keycode::DPAD_LEFT, Action::Left),
            (keycode::BUTTON_Y, Action::Left),
            (keycode::BUTTON_X, Action::Left),
            (keycode::DPAD_DOWN, Action::Right),
            (keycode::DPAD_RIGHT, Action::Right),
            (keycode::BUTTON_A, Action::Right),
            (keycode::BUTTON_B, Action::Right),
        ];

        for (code, expected) in table {
            for source in [SourceFlags::GAMEPAD, SourceFlags::JOYSTICK] {
                assert_eq!(
                    classify(&event(source, code, KeyPhase::Down)),
                    Some(expected),
                    "key code {code} from {source:?}"
                );
            }
        }
    }

    #[test]
    fn unbound_codes_are_ignored() {
        for code in [0, 4, 23, 62, 98, 101, 102, 108, 109] {
            assert_eq!(
                classify(&event(SourceFlags::GAMEPAD, code, KeyPhase::Down)),
                None
            );
        }
    }

    #[test]
    fn non_down_phases_are_ignored() {
        for phase in [KeyPhase::Up, KeyPhase::Other] {
            assert_eq!(
                classify(&event(SourceFlags::GAMEPAD, keycode::BUTTON_A, phase)),
                None
            );
        }
    }

    #[test]
    fn non_controller_sources_are_ignored() {
        for source in [
            SourceFlags::KEYBOARD,
            SourceFlags::DPAD,
            SourceFlags::TOUCHSCREEN,
            SourceFlags::empty(),
        ] {
            assert_eq!(
                classify(&event(source, keycode::DPAD_LEFT, KeyPhase::Down)),
                None
            );
        }
    }
}
