//! Software restart.

use crate::traits::SystemReset;

/// Restarts the chip with `esp_restart()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Reset;

impl SystemReset for Esp32Reset {
    fn reset(&mut self) {
        unsafe { esp_idf_sys::esp_restart() }
    }
}
