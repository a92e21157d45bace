//! Raw key events as delivered by the host input layer.
//!
//! The host hands over one key transition at a time. Source and key-code values
//! follow the platform input constants so events can be forwarded without
//! translation.

use bitflags::bitflags;
use std::time::Instant;

bitflags! {
    /// Device class bits attached to every input event.
    ///
    /// Class masks span several bits; a source belongs to a class only when all
    /// of the class bits are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceFlags: u32 {
        const KEYBOARD = 0x0000_0101;
        const DPAD = 0x0000_0201;
        const GAMEPAD = 0x0000_0401;
        const TOUCHSCREEN = 0x0000_1002;
        const MOUSE = 0x0000_2002;
        const JOYSTICK = 0x0100_0010;
    }
}

impl SourceFlags {
    /// Build flags from a raw host bitmask, keeping unknown bits.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// True when the source is a game-controller-class device.
    pub fn is_game_controller(self) -> bool {
        self.contains(Self::GAMEPAD) || self.contains(Self::JOYSTICK)
    }
}

/// Key code values for the buttons the classifier understands.
pub mod keycode {
    pub const DPAD_UP: i32 = 19;
    pub const DPAD_DOWN: i32 = 20;
    pub const DPAD_LEFT: i32 = 21;
    pub const DPAD_RIGHT: i32 = 22;
    pub const BUTTON_A: i32 = 96;
    pub const BUTTON_B: i32 = 97;
    pub const BUTTON_X: i32 = 99;
    pub const BUTTON_Y: i32 = 100;
}

/// Phase of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
    Other,
}

impl KeyPhase {
    /// Map the host's numeric action (0 = down, 1 = up).
    pub fn from_raw(action: i32) -> Self {
        match action {
            0 => KeyPhase::Down,
            1 => KeyPhase::Up,
            _ => KeyPhase::Other,
        }
    }
}

/// One key transition from the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub source: SourceFlags,
    pub key_code: i32,
    pub phase: KeyPhase,
    pub timestamp: Instant,
}

impl RawInputEvent {
    pub fn new(source: SourceFlags, key_code: i32, phase: KeyPhase, timestamp: Instant) -> Self {
        Self {
            source,
            key_code,
            phase,
            timestamp,
        }
    }

    /// Key-down from a gamepad, stamped now. Mostly useful for tests and simulation.
    pub fn gamepad_down(key_code: i32) -> Self {
        Self::new(SourceFlags::GAMEPAD, key_code, KeyPhase::Down, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamepad_and_joystick_sources_match() {
        assert!(SourceFlags::GAMEPAD.is_game_controller());
        assert!(SourceFlags::JOYSTICK.is_game_controller());
        assert!((SourceFlags::GAMEPAD | SourceFlags::DPAD).is_game_controller());
        assert!(SourceFlags::from_raw(0x0100_0411).is_game_controller());
    }

    #[test]
    fn partial_class_bits_do_not_match() {
        // KEYBOARD shares the 0x1 class bit with GAMEPAD but lacks 0x400.
        assert!(!SourceFlags::KEYBOARD.is_game_controller());
        assert!(!SourceFlags::from_raw(0x0000_0400).is_game_controller());
        assert!(!SourceFlags::from_raw(0x0000_0010).is_game_controller());
        assert!(!SourceFlags::TOUCHSCREEN.is_game_controller());
    }

    #[test]
    fn unknown_bits_are_retained() {
        let flags = SourceFlags::from_raw(0x8000_0401);
        assert_eq!(flags.bits(), 0x8000_0401);
        assert!(flags.is_game_controller());
    }

    #[test]
    fn phase_from_host_action() {
        assert_eq!(KeyPhase::from_raw(0), KeyPhase::Down);
        assert_eq!(KeyPhase::from_raw(1), KeyPhase::Up);
        assert_eq!(KeyPhase::from_raw(2), KeyPhase::Other);
    }
}
