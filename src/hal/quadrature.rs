//! Polled quadrature decoder for mechanical rotary encoders.
//!
//! Works with any pair of [`embedded_hal::digital::InputPin`]s plus a button
//! pin, so the same decoder drives the ESP32 GPIO driver and desktop test
//! pins. Each sample compares the current A/B levels with the previous ones
//! through a Gray-code transition table; invalid transitions (both lines
//! changing between samples) count as zero.
//!
//! Common detented encoders (KY-040, EC11) go through four quadrature states
//! per detent and rest with both lines high. With the default divisor a
//! detent is counted when the lines return to rest, from the quarter-steps
//! seen since the last rest, and the count starts over. A sample missed
//! between polls therefore costs at most that one detent's resolution, never
//! the alignment of the ones after it.
//!
//! # Wiring
//!
//! A and B idle high through pull-ups. The push button shorts to ground when
//! pressed (active low).

use embedded_hal::digital::InputPin;
use tracing::trace;

use crate::traits::EncoderInput;

/// Quarter-steps per detent for common mechanical encoders.
pub const DEFAULT_DIVISOR: i8 = 4;

/// Both lines high: where a detented encoder sits between clicks.
const REST: u8 = 0b11;

/// Indexed by `(previous << 2) | current`, where a state is `(a << 1) | b`.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Quadrature encoder with push button.
///
/// [`EncoderInput::position`] samples the pins before returning, so a loop
/// that reads the position every tick needs nothing else. If that loop can
/// block, wrap the decoder in a [`SampledEncoder`](crate::hal::SampledEncoder).
pub struct QuadratureEncoder<A, B, SW> {
    a: A,
    b: B,
    sw: SW,
    last_state: u8,
    quarters: i8,
    divisor: i8,
    position: i32,
}

impl<A, B, SW> QuadratureEncoder<A, B, SW>
where
    A: InputPin,
    B: InputPin,
    SW: InputPin,
{
    /// Wrap three configured input pins. Position starts at zero.
    pub fn new(mut a: A, mut b: B, sw: SW) -> Self {
        let last_state = read_state(&mut a, &mut b).unwrap_or(0b11);
        Self {
            a,
            b,
            sw,
            last_state,
            quarters: 0,
            divisor: DEFAULT_DIVISOR,
            position: 0,
        }
    }

    /// Set quarter-steps per count (1, 2 or 4).
    pub fn with_divisor(mut self, divisor: i8) -> Self {
        self.divisor = divisor.clamp(1, 4);
        self
    }

    /// Sample A/B once and update the position.
    pub fn poll(&mut self) {
        let Some(state) = read_state(&mut self.a, &mut self.b) else {
            trace!("encoder pin read failed, skipping sample");
            return;
        };
        let step = TRANSITIONS[usize::from((self.last_state << 2) | state)];
        self.last_state = state;

        if self.divisor == DEFAULT_DIVISOR {
            self.quarters = self.quarters.saturating_add(step);
            if state == REST {
                // Half a cycle in one direction is a detent with missed samples.
                if self.quarters >= 2 {
                    self.position += 1;
                } else if self.quarters <= -2 {
                    self.position -= 1;
                }
                self.quarters = 0;
            }
            return;
        }

        if step == 0 {
            return;
        }
        self.quarters += step;
        if self.quarters >= self.divisor {
            self.position += 1;
            self.quarters -= self.divisor;
        } else if self.quarters <= -self.divisor {
            self.position -= 1;
            self.quarters += self.divisor;
        }
    }

    /// Position without sampling.
    #[inline]
    pub fn current_position(&self) -> i32 {
        self.position
    }

    /// Release the pins.
    pub fn release(self) -> (A, B, SW) {
        (self.a, self.b, self.sw)
    }
}

impl<A, B, SW> EncoderInput for QuadratureEncoder<A, B, SW>
where
    A: InputPin,
    B: InputPin,
    SW: InputPin,
{
    fn position(&mut self) -> i32 {
        self.poll();
        self.position
    }

    fn button_pressed(&mut self) -> bool {
        self.sw.is_low().unwrap_or(false)
    }
}

fn read_state<A: InputPin, B: InputPin>(a: &mut A, b: &mut B) -> Option<u8> {
    let a = a.is_high().ok()?;
    let b = b.is_high().ok()?;
    Some((u8::from(a) << 1) | u8::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Input pin whose level the test controls through a shared cell.
    #[derive(Clone)]
    struct TestPin(Rc<Cell<bool>>);

    impl TestPin {
        fn high() -> Self {
            TestPin(Rc::new(Cell::new(true)))
        }

        fn set(&self, high: bool) {
            self.0.set(high);
        }
    }

    impl ErrorType for TestPin {
        type Error = Infallible;
    }

    impl InputPin for TestPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct Rig {
        a: TestPin,
        b: TestPin,
        sw: TestPin,
        enc: QuadratureEncoder<TestPin, TestPin, TestPin>,
    }

    fn rig() -> Rig {
        let (a, b, sw) = (TestPin::high(), TestPin::high(), TestPin::high());
        let enc = QuadratureEncoder::new(a.clone(), b.clone(), sw.clone());
        Rig { a, b, sw, enc }
    }

    impl Rig {
        /// Drive A/B through `states` (as `(a, b)`), polling after each.
        fn drive(&mut self, states: &[(bool, bool)]) {
            for &(a, b) in states {
                self.a.set(a);
                self.b.set(b);
                self.enc.poll();
            }
        }
    }

    // One detent clockwise from rest (11): A falls first.
    const CW: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];
    const CCW: [(bool, bool); 4] = [(true, false), (false, false), (false, true), (true, true)];

    #[test]
    fn one_detent_each_way() {
        let mut r = rig();
        r.drive(&CW);
        let cw = r.enc.position();
        assert_eq!(cw.abs(), 1);
        r.drive(&CCW);
        assert_eq!(r.enc.position(), 0);
        r.drive(&CCW);
        assert_eq!(r.enc.position(), -cw);
    }

    #[test]
    fn partial_detent_does_not_count() {
        let mut r = rig();
        r.drive(&CW[..3]);
        assert_eq!(r.enc.current_position(), 0);
        r.drive(&CW[3..]);
        assert_eq!(r.enc.current_position().abs(), 1);
    }

    #[test]
    fn bounce_back_cancels() {
        let mut r = rig();
        r.drive(&[(false, true), (true, true), (false, true), (true, true)]);
        assert_eq!(r.enc.current_position(), 0);
    }

    #[test]
    fn skipped_state_is_ignored() {
        let mut r = rig();
        // 11 -> 00 changes both lines at once.
        r.drive(&[(false, false), (true, true)]);
        assert_eq!(r.enc.current_position(), 0);
    }

    #[test]
    fn missed_state_does_not_shift_later_detents() {
        let mut r = rig();
        // First detent with its (0, 1) state missed between samples.
        r.drive(&CW[1..]);
        r.drive(&CW);
        r.drive(&CW);
        assert_eq!(r.enc.current_position(), 3);

        r.drive(&CCW);
        assert_eq!(r.enc.current_position(), 2);
    }

    #[test]
    fn jitter_around_rest_is_discarded() {
        let mut r = rig();
        r.drive(&[(false, true), (false, false), (false, true), (true, true)]);
        assert_eq!(r.enc.current_position(), 0);
        r.drive(&CW);
        assert_eq!(r.enc.current_position(), 1);
    }

    #[test]
    fn divisor_one_counts_every_edge() {
        let (a, b, sw) = (TestPin::high(), TestPin::high(), TestPin::high());
        let mut enc = QuadratureEncoder::new(a.clone(), b.clone(), sw).with_divisor(1);
        for &(la, lb) in &CW {
            a.set(la);
            b.set(lb);
            enc.poll();
        }
        assert_eq!(enc.current_position().abs(), 4);
    }

    #[test]
    fn button_is_active_low() {
        let mut r = rig();
        assert!(!r.enc.button_pressed());
        r.sw.set(false);
        assert!(r.enc.button_pressed());
    }

    #[test]
    fn release_returns_pins() {
        let r = rig();
        let (mut a, _, _) = r.enc.release();
        assert_eq!(a.is_high(), Ok(true));
    }
}
