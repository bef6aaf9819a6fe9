//! Hardware abstraction traits for encoder input, timekeeping, and reset.
//!
//! These are the seams that let the gesture machine and controller run on
//! the desktop against [`crate::hal::mock`] and on the device against
//! `hal::esp32` (requires `esp32` feature).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`EncoderInput`] | Rotary encoder position and push button level |
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`SystemReset`] | Hard platform restart |
//!
//! Blocking delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! # Example
//!
//! ```rust
//! use rs_knob::traits::{Clock, EncoderInput};
//! use rs_knob::hal::{MockClock, MockEncoder};
//!
//! let mut encoder = MockEncoder::new();
//! encoder.set_position(3);
//! encoder.set_button(true);
//! assert_eq!(encoder.position(), 3);
//! assert!(encoder.button_pressed());
//!
//! let mut clock = MockClock::new();
//! clock.advance(10);
//! assert_eq!(clock.now_ms(), 10);
//! ```

/// Rotary encoder with push button.
///
/// # Implementation Notes
///
/// - `position()` is an absolute counter with arbitrary origin; it is never
///   reset by reading. Positive steps are clockwise.
/// - Implementations that decode quadrature by polling should advance their
///   decoder inside `position()` or in a separate `poll()` called every loop.
/// - `button_pressed()` reports the debounced level, not an edge.
pub trait EncoderInput {
    /// Current detent count.
    fn position(&mut self) -> i32;

    /// Returns true while the button is held down.
    fn button_pressed(&mut self) -> bool;
}

/// Time source.
///
/// Provides monotonic time in milliseconds. On desktop this can wrap
/// `std::time::Instant`; on the device use the hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_knob::traits::Clock;
/// use rs_knob::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(800);
/// assert_eq!(clock.now_ms(), 800);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Hard platform restart.
///
/// On hardware `reset()` does not return. Test doubles record the request
/// and return so the caller's loop can observe it.
pub trait SystemReset {
    /// Restart the platform.
    fn reset(&mut self);
}

/// [`Clock`] backed by [`std::time::Instant`], for desktop simulation.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: std::time::Instant,
}

impl StdClock {
    /// Creates a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
