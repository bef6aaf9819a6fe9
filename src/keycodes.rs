//! USB HID usage codes for the keyboard and consumer-control pages.
//!
//! Keyboard codes follow the HID Usage Tables "Keyboard/Keypad" page (0x07).
//! Modifiers are carried as ordinary keycodes in the `0xE0..=0xE7` range and
//! folded into the report's modifier byte by [`crate::report::KeyboardReport`].
//!
//! # Example
//!
//! ```rust
//! use rs_knob::keycodes::{keycode_of, Keycode};
//!
//! assert_eq!(keycode_of("ctrl"), Some(Keycode::LEFT_CONTROL));
//! assert_eq!(keycode_of("F5"), Some(Keycode::F5));
//! assert_eq!(keycode_of("not-a-key"), None);
//! ```

/// A keyboard page usage ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keycode(pub u8);

impl Keycode {
    pub const A: Keycode = Keycode(0x04);
    pub const B: Keycode = Keycode(0x05);
    pub const C: Keycode = Keycode(0x06);
    pub const D: Keycode = Keycode(0x07);
    pub const E: Keycode = Keycode(0x08);
    pub const F: Keycode = Keycode(0x09);
    pub const G: Keycode = Keycode(0x0A);
    pub const H: Keycode = Keycode(0x0B);
    pub const I: Keycode = Keycode(0x0C);
    pub const J: Keycode = Keycode(0x0D);
    pub const K: Keycode = Keycode(0x0E);
    pub const L: Keycode = Keycode(0x0F);
    pub const M: Keycode = Keycode(0x10);
    pub const N: Keycode = Keycode(0x11);
    pub const O: Keycode = Keycode(0x12);
    pub const P: Keycode = Keycode(0x13);
    pub const Q: Keycode = Keycode(0x14);
    pub const R: Keycode = Keycode(0x15);
    pub const S: Keycode = Keycode(0x16);
    pub const T: Keycode = Keycode(0x17);
    pub const U: Keycode = Keycode(0x18);
    pub const V: Keycode = Keycode(0x19);
    pub const W: Keycode = Keycode(0x1A);
    pub const X: Keycode = Keycode(0x1B);
    pub const Y: Keycode = Keycode(0x1C);
    pub const Z: Keycode = Keycode(0x1D);

    pub const ONE: Keycode = Keycode(0x1E);
    pub const TWO: Keycode = Keycode(0x1F);
    pub const THREE: Keycode = Keycode(0x20);
    pub const FOUR: Keycode = Keycode(0x21);
    pub const FIVE: Keycode = Keycode(0x22);
    pub const SIX: Keycode = Keycode(0x23);
    pub const SEVEN: Keycode = Keycode(0x24);
    pub const EIGHT: Keycode = Keycode(0x25);
    pub const NINE: Keycode = Keycode(0x26);
    pub const ZERO: Keycode = Keycode(0x27);

    pub const ENTER: Keycode = Keycode(0x28);
    pub const ESCAPE: Keycode = Keycode(0x29);
    pub const BACKSPACE: Keycode = Keycode(0x2A);
    pub const TAB: Keycode = Keycode(0x2B);
    pub const SPACE: Keycode = Keycode(0x2C);

    pub const F1: Keycode = Keycode(0x3A);
    pub const F2: Keycode = Keycode(0x3B);
    pub const F3: Keycode = Keycode(0x3C);
    pub const F4: Keycode = Keycode(0x3D);
    pub const F5: Keycode = Keycode(0x3E);
    pub const F6: Keycode = Keycode(0x3F);
    pub const F7: Keycode = Keycode(0x40);
    pub const F8: Keycode = Keycode(0x41);
    pub const F9: Keycode = Keycode(0x42);
    pub const F10: Keycode = Keycode(0x43);
    pub const F11: Keycode = Keycode(0x44);
    pub const F12: Keycode = Keycode(0x45);

    pub const INSERT: Keycode = Keycode(0x49);
    pub const HOME: Keycode = Keycode(0x4A);
    pub const PAGE_UP: Keycode = Keycode(0x4B);
    pub const DELETE: Keycode = Keycode(0x4C);
    pub const END: Keycode = Keycode(0x4D);
    pub const PAGE_DOWN: Keycode = Keycode(0x4E);
    pub const RIGHT_ARROW: Keycode = Keycode(0x4F);
    pub const LEFT_ARROW: Keycode = Keycode(0x50);
    pub const DOWN_ARROW: Keycode = Keycode(0x51);
    pub const UP_ARROW: Keycode = Keycode(0x52);

    pub const LEFT_CONTROL: Keycode = Keycode(0xE0);
    pub const LEFT_SHIFT: Keycode = Keycode(0xE1);
    pub const LEFT_ALT: Keycode = Keycode(0xE2);
    pub const LEFT_GUI: Keycode = Keycode(0xE3);
    pub const RIGHT_CONTROL: Keycode = Keycode(0xE4);
    pub const RIGHT_SHIFT: Keycode = Keycode(0xE5);
    pub const RIGHT_ALT: Keycode = Keycode(0xE6);
    pub const RIGHT_GUI: Keycode = Keycode(0xE7);

    /// Returns true for the eight modifier usages.
    #[inline]
    pub const fn is_modifier(self) -> bool {
        self.0 >= 0xE0 && self.0 <= 0xE7
    }

    /// Bit for this modifier in the boot report's modifier byte, or 0.
    #[inline]
    pub const fn modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self.0 - 0xE0)
        } else {
            0
        }
    }
}

/// A consumer page (0x0C) usage ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConsumerCode(pub u16);

impl ConsumerCode {
    pub const SCAN_NEXT_TRACK: ConsumerCode = ConsumerCode(0xB5);
    pub const SCAN_PREVIOUS_TRACK: ConsumerCode = ConsumerCode(0xB6);
    pub const PLAY_PAUSE: ConsumerCode = ConsumerCode(0xCD);
    pub const MUTE: ConsumerCode = ConsumerCode(0xE2);
    pub const VOLUME_INCREMENT: ConsumerCode = ConsumerCode(0xE9);
    pub const VOLUME_DECREMENT: ConsumerCode = ConsumerCode(0xEA);
}

/// Resolve a symbolic key name to its keycode.
///
/// Matching trims whitespace and ignores ASCII case. Common aliases are
/// accepted (`CTRL`, `WIN`, `CMD`, `ESC`, `DEL`, `UP`, `PGUP`, ...). Unknown
/// names return `None`; this function never panics.
pub fn keycode_of(name: &str) -> Option<Keycode> {
    let upper = name.trim().to_ascii_uppercase();
    let key = match upper.as_str() {
        // Modifiers
        "LEFT_CONTROL" | "CONTROL" | "CTRL" => Keycode::LEFT_CONTROL,
        "LEFT_SHIFT" | "SHIFT" => Keycode::LEFT_SHIFT,
        "LEFT_ALT" | "ALT" => Keycode::LEFT_ALT,
        "LEFT_GUI" | "WIN" | "CMD" | "COMMAND" => Keycode::LEFT_GUI,
        "RIGHT_CONTROL" | "RCTRL" => Keycode::RIGHT_CONTROL,
        "RIGHT_SHIFT" | "RSHIFT" => Keycode::RIGHT_SHIFT,
        "RIGHT_ALT" | "RALT" | "ALT_GR" => Keycode::RIGHT_ALT,
        "RIGHT_GUI" | "RWIN" | "RCMD" => Keycode::RIGHT_GUI,

        // Digits
        "1" => Keycode::ONE,
        "2" => Keycode::TWO,
        "3" => Keycode::THREE,
        "4" => Keycode::FOUR,
        "5" => Keycode::FIVE,
        "6" => Keycode::SIX,
        "7" => Keycode::SEVEN,
        "8" => Keycode::EIGHT,
        "9" => Keycode::NINE,
        "0" => Keycode::ZERO,

        // Common keys
        "ENTER" | "RETURN" => Keycode::ENTER,
        "ESCAPE" | "ESC" => Keycode::ESCAPE,
        "BACKSPACE" => Keycode::BACKSPACE,
        "TAB" => Keycode::TAB,
        "SPACE" | "SPACEBAR" => Keycode::SPACE,
        "DELETE" | "DEL" => Keycode::DELETE,

        // Navigation
        "UP_ARROW" | "UP" => Keycode::UP_ARROW,
        "DOWN_ARROW" | "DOWN" => Keycode::DOWN_ARROW,
        "LEFT_ARROW" | "LEFT" => Keycode::LEFT_ARROW,
        "RIGHT_ARROW" | "RIGHT" => Keycode::RIGHT_ARROW,
        "PAGE_UP" | "PGUP" => Keycode::PAGE_UP,
        "PAGE_DOWN" | "PGDN" => Keycode::PAGE_DOWN,
        "HOME" => Keycode::HOME,
        "END" => Keycode::END,
        "INSERT" => Keycode::INSERT,

        other => return letter_or_function(other),
    };
    Some(key)
}

/// Letters `A`-`Z` and function keys `F1`-`F12`.
fn letter_or_function(name: &str) -> Option<Keycode> {
    let bytes = name.as_bytes();
    match bytes {
        [c @ b'A'..=b'Z'] => Some(Keycode(Keycode::A.0 + (c - b'A'))),
        [b'F', rest @ ..] if !rest.is_empty() => {
            let n: u8 = core::str::from_utf8(rest).ok()?.parse().ok()?;
            (1..=12)
                .contains(&n)
                .then(|| Keycode(Keycode::F1.0 + (n - 1)))
        }
        _ => None,
    }
}
