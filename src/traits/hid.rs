//! HID output transport.
//!
//! A [`HidTransport`] pushes keyboard, consumer-control and mouse events to
//! the host. Writes are fire-and-forget: there is no acknowledgement, and a
//! failed write is reported once and never replayed.

use crate::keycodes::{ConsumerCode, Keycode};

/// Mouse buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Bit in the mouse report's button byte.
    #[inline]
    pub const fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x02,
            MouseButton::Middle => 0x04,
        }
    }
}

/// Composite keyboard + consumer-control + mouse device.
///
/// # Implementation Notes
///
/// - `send_consumer` is a full press-and-release of one usage.
/// - `press_keys` adds keys to the held set; `release_all` clears it.
/// - Mouse deltas are relative and already scaled by the caller.
pub trait HidTransport {
    /// Error type for report writes.
    type Error: core::fmt::Debug;

    /// Press and release a consumer-control usage.
    fn send_consumer(&mut self, code: ConsumerCode) -> Result<(), Self::Error>;

    /// Press every key in `keys` at once and keep them held.
    fn press_keys(&mut self, keys: &[Keycode]) -> Result<(), Self::Error>;

    /// Release every held key.
    fn release_all(&mut self) -> Result<(), Self::Error>;

    /// Relative pointer motion plus vertical wheel and horizontal pan.
    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8, pan: i8) -> Result<(), Self::Error>;

    /// Press and release a mouse button.
    fn mouse_click(&mut self, button: MouseButton) -> Result<(), Self::Error>;

    /// Tap a key combination: press all, then release all.
    ///
    /// The release is attempted even if the press fails so no key is left
    /// stuck down on the host; the press error wins.
    fn send_keys(&mut self, keys: &[Keycode]) -> Result<(), Self::Error> {
        let pressed = self.press_keys(keys);
        let released = self.release_all();
        pressed.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<&'static str>,
        fail_press: bool,
    }

    impl HidTransport for Recorder {
        type Error = ();

        fn send_consumer(&mut self, _code: ConsumerCode) -> Result<(), ()> {
            self.log.push("consumer");
            Ok(())
        }

        fn press_keys(&mut self, _keys: &[Keycode]) -> Result<(), ()> {
            self.log.push("press");
            if self.fail_press {
                Err(())
            } else {
                Ok(())
            }
        }

        fn release_all(&mut self) -> Result<(), ()> {
            self.log.push("release");
            Ok(())
        }

        fn mouse_move(&mut self, _x: i8, _y: i8, _wheel: i8, _pan: i8) -> Result<(), ()> {
            self.log.push("move");
            Ok(())
        }

        fn mouse_click(&mut self, _button: MouseButton) -> Result<(), ()> {
            self.log.push("click");
            Ok(())
        }
    }

    #[test]
    fn send_keys_presses_then_releases() {
        let mut hid = Recorder::default();
        hid.send_keys(&[Keycode::LEFT_CONTROL, Keycode::Z]).unwrap();
        assert_eq!(hid.log, vec!["press", "release"]);
    }

    #[test]
    fn send_keys_releases_after_failed_press() {
        let mut hid = Recorder {
            fail_press: true,
            ..Default::default()
        };
        assert!(hid.send_keys(&[Keycode::A]).is_err());
        assert_eq!(hid.log, vec!["press", "release"]);
    }

    #[test]
    fn mouse_button_masks() {
        assert_eq!(MouseButton::Left.mask(), 1);
        assert_eq!(MouseButton::Right.mask(), 2);
        assert_eq!(MouseButton::Middle.mask(), 4);
    }
}
