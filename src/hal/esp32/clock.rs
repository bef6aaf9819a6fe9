//! ESP32 clock implementation using the ESP-IDF high-resolution timer.

use crate::traits::Clock;

/// Milliseconds since boot from `esp_timer_get_time()`.
///
/// # Example
///
/// ```ignore
/// use rs_knob::hal::esp32::Esp32Clock;
/// use rs_knob::traits::Clock;
///
/// let clock = Esp32Clock::new();
/// let pressed_at = clock.now_ms();
/// // ... button held ...
/// let held_for = clock.now_ms() - pressed_at;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // Microseconds since boot; a plain read of the system timer.
        let micros = unsafe { esp_idf_sys::esp_timer_get_time() };
        (micros / 1000) as u64
    }
}
