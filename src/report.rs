//! HID report encoders.
//!
//! Byte layouts for the three report types the device exposes:
//!
//! | Report | Length | Layout |
//! |--------|--------|--------|
//! | [`KeyboardReport`] | 8 | modifiers, reserved, 6 key slots |
//! | [`ConsumerReport`] | 2 | 16-bit usage, little endian |
//! | [`MouseReport`] | 5 | buttons, x, y, wheel, pan |
//!
//! These match the boot-protocol keyboard and the report descriptor in
//! `hal::esp32::hid`, so any transport that can push raw reports can reuse them.

use heapless::Vec as HVec;

use crate::keycodes::{ConsumerCode, Keycode};
use crate::traits::MouseButton;

/// Number of simultaneous non-modifier keys in a boot keyboard report.
pub const KEY_SLOTS: usize = 6;

/// Boot-protocol keyboard report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    /// Modifier bitmask (bit 0 = left control ... bit 7 = right GUI).
    pub modifiers: u8,
    /// Pressed non-modifier keys.
    pub keys: HVec<Keycode, KEY_SLOTS>,
}

impl KeyboardReport {
    /// An all-released report.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a report from a set of held keys.
    ///
    /// Modifiers fold into the bitmask. Duplicate keys are collapsed. Keys past
    /// the sixth slot are dropped; the returned count says how many.
    pub fn from_keys(held: &[Keycode]) -> (Self, usize) {
        let mut report = Self::empty();
        let mut dropped = 0;
        for &key in held {
            if key.is_modifier() {
                report.modifiers |= key.modifier_bit();
            } else if !report.keys.contains(&key) && report.keys.push(key).is_err() {
                dropped += 1;
            }
        }
        (report, dropped)
    }

    /// Encode to the 8-byte wire format.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0] = self.modifiers;
        for (slot, key) in out[2..].iter_mut().zip(self.keys.iter()) {
            *slot = key.0;
        }
        out
    }
}

/// Consumer-control report carrying a single usage (0 = released).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsumerReport(pub u16);

impl ConsumerReport {
    /// Report for a pressed usage.
    pub fn pressed(code: ConsumerCode) -> Self {
        Self(code.0)
    }

    /// Released report.
    pub fn released() -> Self {
        Self(0)
    }

    /// Encode to the 2-byte wire format.
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

/// Relative mouse report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
    pub pan: i8,
}

impl MouseReport {
    /// Motion-only report.
    pub fn motion(x: i8, y: i8, wheel: i8, pan: i8) -> Self {
        Self {
            buttons: 0,
            x,
            y,
            wheel,
            pan,
        }
    }

    /// Report with a single button held and no motion.
    pub fn button(button: MouseButton) -> Self {
        Self {
            buttons: button.mask(),
            ..Self::default()
        }
    }

    /// Encode to the 5-byte wire format.
    pub fn to_bytes(self) -> [u8; 5] {
        [
            self.buttons,
            self.x as u8,
            self.y as u8,
            self.wheel as u8,
            self.pan as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_z_report() {
        let (report, dropped) = KeyboardReport::from_keys(&[Keycode::LEFT_CONTROL, Keycode::Z]);
        assert_eq!(dropped, 0);
        assert_eq!(report.to_bytes(), [0x01, 0, 0x1D, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn modifiers_only_report_has_empty_slots() {
        let (report, _) = KeyboardReport::from_keys(&[
            Keycode::LEFT_CONTROL,
            Keycode::LEFT_SHIFT,
            Keycode::RIGHT_GUI,
        ]);
        assert_eq!(report.to_bytes(), [0x83, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn seventh_key_is_dropped() {
        let keys = [
            Keycode::A,
            Keycode::B,
            Keycode::C,
            Keycode::D,
            Keycode::E,
            Keycode::F,
            Keycode::G,
        ];
        let (report, dropped) = KeyboardReport::from_keys(&keys);
        assert_eq!(dropped, 1);
        assert_eq!(report.keys.len(), KEY_SLOTS);
        assert!(!report.keys.contains(&Keycode::G));
    }

    #[test]
    fn duplicate_keys_collapse() {
        let (report, dropped) = KeyboardReport::from_keys(&[Keycode::A, Keycode::A]);
        assert_eq!(dropped, 0);
        assert_eq!(report.keys.len(), 1);
    }

    #[test]
    fn consumer_report_is_little_endian() {
        assert_eq!(
            ConsumerReport::pressed(ConsumerCode::VOLUME_INCREMENT).to_bytes(),
            [0xE9, 0x00]
        );
        assert_eq!(ConsumerReport::released().to_bytes(), [0, 0]);
    }

    #[test]
    fn mouse_report_twos_complement() {
        let bytes = MouseReport::motion(-4, 4, -1, 1).to_bytes();
        assert_eq!(bytes, [0, 0xFC, 0x04, 0xFF, 0x01]);
        assert_eq!(MouseReport::button(MouseButton::Middle).to_bytes()[0], 0x04);
    }
}
