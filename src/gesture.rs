//! Gesture state machine: encoder and button samples in, discrete gestures out.
//!
//! One [`GestureMachine::tick`] per loop iteration. Each tick emits at most
//! one gesture. Rotation is detected by comparing the absolute position with
//! the last position a gesture consumed, so a burst of detents between two
//! polls still produces a single step in that direction.
//!
//! # States
//!
//! | State | Input | Emits | Next |
//! |-------|-------|-------|------|
//! | `Released` | button down | | `PressedAwaiting` |
//! | `Released` | moved | `cw` / `ccw` | `Released` |
//! | `PressedAwaiting` | button up | `click` | `Released` |
//! | `PressedAwaiting` | moved while held | `cw_shifted` / `ccw_shifted` | `ShiftedAwaiting` |
//! | `PressedAwaiting` | held past threshold | `long_press` | `LongPressDone` |
//! | `LongPressDone` | button up | | `Released` |
//! | `ShiftedAwaiting` | button up | | `Released` |
//! | `ShiftedAwaiting` | moved while held | `cw_shifted` / `ccw_shifted` | `ShiftedAwaiting` |
//!
//! Rotation while held is checked before the long-press timeout, so turning
//! the knob at any point before the threshold turns the hold into a shift.
//!
//! # Example
//!
//! ```rust
//! use rs_knob::config::GestureSlot;
//! use rs_knob::gesture::{ButtonState, GestureMachine};
//!
//! let mut machine = GestureMachine::new(0);
//!
//! assert_eq!(machine.tick(1, false, 0), Some(GestureSlot::Cw));
//! assert_eq!(machine.tick(1, true, 10), None);
//! assert_eq!(machine.tick(1, true, 820), Some(GestureSlot::LongPress));
//! assert_eq!(machine.state(), ButtonState::LongPressDone);
//! assert_eq!(machine.tick(1, false, 900), None);
//! assert_eq!(machine.state(), ButtonState::Released);
//! ```

use crate::config::GestureSlot;
use crate::traits::EncoderInput;

/// Hold time after which a press without rotation becomes a long press.
pub const LONG_PRESS_THRESHOLD_MS: u64 = 800;

/// Button phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    /// Idle.
    #[default]
    Released = 0,
    /// Down, waiting to become a click, shift or long press.
    PressedAwaiting = 1,
    /// Long press emitted, waiting for release.
    LongPressDone = 2,
    /// Shifted rotation emitted, waiting for release or more rotation.
    ShiftedAwaiting = 3,
}

/// Encoder position tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderState {
    /// Position at the last emitted rotation gesture.
    pub last_position: i32,
}

/// Gesture recognizer.
#[derive(Clone, Debug)]
pub struct GestureMachine {
    state: ButtonState,
    encoder: EncoderState,
    pressed_at_ms: u64,
    long_press_ms: u64,
}

impl GestureMachine {
    /// Start in `Released` with the encoder's current position as reference.
    pub fn new(initial_position: i32) -> Self {
        Self {
            state: ButtonState::Released,
            encoder: EncoderState {
                last_position: initial_position,
            },
            pressed_at_ms: 0,
            long_press_ms: LONG_PRESS_THRESHOLD_MS,
        }
    }

    /// Override the long-press threshold.
    pub fn with_long_press_ms(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }

    /// Current button phase.
    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Position the next rotation is measured from.
    #[inline]
    pub fn last_position(&self) -> i32 {
        self.encoder.last_position
    }

    /// Long-press threshold in milliseconds.
    #[inline]
    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    /// Sample an encoder and advance one tick.
    pub fn poll<E: EncoderInput + ?Sized>(&mut self, encoder: &mut E, now_ms: u64) -> Option<GestureSlot> {
        let position = encoder.position();
        let pressed = encoder.button_pressed();
        self.tick(position, pressed, now_ms)
    }

    /// Advance one tick with an explicit sample.
    pub fn tick(&mut self, position: i32, pressed: bool, now_ms: u64) -> Option<GestureSlot> {
        match self.state {
            ButtonState::Released => {
                if pressed {
                    self.state = ButtonState::PressedAwaiting;
                    self.pressed_at_ms = now_ms;
                    None
                } else {
                    self.step(position, GestureSlot::Cw, GestureSlot::Ccw)
                }
            }
            ButtonState::PressedAwaiting => {
                if !pressed {
                    self.state = ButtonState::Released;
                    Some(GestureSlot::Click)
                } else if let Some(gesture) =
                    self.step(position, GestureSlot::CwShifted, GestureSlot::CcwShifted)
                {
                    self.state = ButtonState::ShiftedAwaiting;
                    Some(gesture)
                } else if now_ms.saturating_sub(self.pressed_at_ms) >= self.long_press_ms {
                    self.state = ButtonState::LongPressDone;
                    Some(GestureSlot::LongPress)
                } else {
                    None
                }
            }
            ButtonState::LongPressDone => {
                if !pressed {
                    self.state = ButtonState::Released;
                }
                None
            }
            ButtonState::ShiftedAwaiting => {
                if pressed {
                    self.step(position, GestureSlot::CwShifted, GestureSlot::CcwShifted)
                } else {
                    self.state = ButtonState::Released;
                    None
                }
            }
        }
    }

    /// One rotation gesture if the position moved, consuming the movement.
    fn step(&mut self, position: i32, cw: GestureSlot, ccw: GestureSlot) -> Option<GestureSlot> {
        let last = self.encoder.last_position;
        if position == last {
            return None;
        }
        self.encoder.last_position = position;
        Some(if position > last { cw } else { ccw })
    }
}
