//! The control loop.
//!
//! [`KnobController`] owns the hardware handles and runtime state and runs
//! one loop iteration per [`KnobController::poll`]:
//!
//! 1. Drain the host command channel (`REBOOT` resets the device).
//! 2. Sample the encoder and button, advance the gesture machine.
//! 3. Dispatch the emitted gesture, if any, against the active profile.
//!
//! The caller owns timing: it passes the current time in and sleeps
//! [`LOOP_PERIOD_MS`] between iterations.
//!
//! # Example
//!
//! ```rust
//! use rs_knob::config::Configuration;
//! use rs_knob::controller::{KnobController, KnobIo};
//! use rs_knob::hal::{MockChannel, MockDelay, MockEncoder, MockHid, MockReset};
//! use rs_knob::keycodes::ConsumerCode;
//!
//! let io = KnobIo {
//!     encoder: MockEncoder::new(),
//!     hid: MockHid::new(),
//!     channel: MockChannel::new(),
//!     reset: MockReset::new(),
//!     delay: MockDelay::new(),
//! };
//! let mut knob = KnobController::new(io, Configuration::default());
//!
//! knob.io_mut().encoder.rotate(1);
//! knob.poll(0);
//!
//! assert_eq!(knob.io().hid.consumer_count(ConsumerCode::VOLUME_INCREMENT), 1);
//! ```

use embedded_hal::delay::DelayNs;

use crate::command::{Command, CommandHandler};
use crate::config::{Configuration, GestureSlot};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::gesture::{ButtonState, GestureMachine};
use crate::state::RuntimeState;
use crate::traits::{CommandChannel, EncoderInput, HidTransport, SystemReset};

/// Target loop period.
pub const LOOP_PERIOD_MS: u32 = 10;

/// Hardware handles the controller drives.
#[derive(Debug)]
pub struct KnobIo<E, H, C, R, D> {
    pub encoder: E,
    pub hid: H,
    pub channel: C,
    pub reset: R,
    pub delay: D,
}

/// What one loop iteration did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Host command handled this iteration.
    pub command: Option<Command>,
    /// Gesture recognized this iteration.
    pub gesture: Option<GestureSlot>,
    /// Result of dispatching that gesture.
    pub dispatched: Option<DispatchOutcome>,
}

/// Rotary-knob HID controller.
pub struct KnobController<E, H, C, R, D> {
    io: KnobIo<E, H, C, R, D>,
    state: RuntimeState,
    gestures: GestureMachine,
    dispatcher: Dispatcher,
    commands: CommandHandler,
}

impl<E, H, C, R, D> KnobController<E, H, C, R, D>
where
    E: EncoderInput,
    H: HidTransport,
    C: CommandChannel,
    R: SystemReset,
    D: DelayNs,
{
    /// Build a controller. The encoder's current position becomes the
    /// rotation reference, so power-on position is never reported as movement.
    pub fn new(mut io: KnobIo<E, H, C, R, D>, config: Configuration) -> Self {
        let origin = io.encoder.position();
        Self {
            io,
            state: RuntimeState::new(config),
            gestures: GestureMachine::new(origin),
            dispatcher: Dispatcher::new(),
            commands: CommandHandler::new(),
        }
    }

    /// Replace the dispatcher (timing overrides).
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Replace the command handler.
    pub fn with_command_handler(mut self, commands: CommandHandler) -> Self {
        self.commands = commands;
        self
    }

    /// Override the long-press threshold.
    pub fn with_long_press_ms(mut self, ms: u64) -> Self {
        self.gestures = self.gestures.with_long_press_ms(ms);
        self
    }

    /// Run one loop iteration at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> PollOutcome {
        let io = &mut self.io;
        let command = self.commands.poll(&mut io.channel, &mut io.delay, &mut io.reset);

        let gesture = self.gestures.poll(&mut io.encoder, now_ms);
        let dispatched = gesture.map(|slot| {
            self.dispatcher
                .dispatch(slot, &mut self.state, &mut io.hid, &mut io.delay)
        });

        PollOutcome {
            command,
            gesture,
            dispatched,
        }
    }

    /// Runtime state (active profile, configuration).
    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// Current button phase.
    pub fn button_state(&self) -> ButtonState {
        self.gestures.state()
    }

    /// Hardware handles.
    pub fn io(&self) -> &KnobIo<E, H, C, R, D> {
        &self.io
    }

    /// Mutable hardware handles.
    pub fn io_mut(&mut self) -> &mut KnobIo<E, H, C, R, D> {
        &mut self.io
    }

    /// Give the hardware handles back.
    pub fn into_io(self) -> KnobIo<E, H, C, R, D> {
        self.io
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::hal::{MockChannel, MockDelay, MockEncoder, MockHid, MockReset};

    type TestKnob = KnobController<MockEncoder, MockHid, MockChannel, MockReset, MockDelay>;

    fn knob(config: Configuration) -> TestKnob {
        let io = KnobIo {
            encoder: MockEncoder::new(),
            hid: MockHid::new(),
            channel: MockChannel::new(),
            reset: MockReset::new(),
            delay: MockDelay::new(),
        };
        KnobController::new(io, config)
    }

    #[test]
    fn idle_poll_does_nothing() {
        let mut k = knob(Configuration::default());
        assert_eq!(k.poll(0), PollOutcome::default());
        assert!(k.io().hid.events.is_empty());
    }

    #[test]
    fn starting_position_is_not_movement() {
        let mut io = KnobIo {
            encoder: MockEncoder::new(),
            hid: MockHid::new(),
            channel: MockChannel::new(),
            reset: MockReset::new(),
            delay: MockDelay::new(),
        };
        io.encoder.set_position(42);
        let mut k = KnobController::new(io, Configuration::default());
        assert_eq!(k.poll(0).gesture, None);
    }

    #[test]
    fn rotation_dispatches() {
        let mut k = knob(Configuration::default());
        k.io_mut().encoder.rotate(-1);
        let out = k.poll(0);
        assert_eq!(out.gesture, Some(GestureSlot::Ccw));
        assert_eq!(
            out.dispatched,
            Some(DispatchOutcome::Fired {
                action: ActionKind::VolumeDown,
                times: 1
            })
        );
    }

    #[test]
    fn reboot_is_handled_alongside_gestures() {
        let mut k = knob(Configuration::default());
        k.io_mut().channel.push(b"REBOOT\n");
        let out = k.poll(0);
        assert_eq!(out.command, Some(Command::Reboot));
        assert_eq!(k.io().reset.count, 1);
    }

    #[test]
    fn long_press_switches_profile() {
        let mut k = knob(Configuration::default()).with_long_press_ms(100);
        k.io_mut().encoder.set_button(true);
        k.poll(0);
        let out = k.poll(100);
        assert_eq!(out.gesture, Some(GestureSlot::LongPress));
        assert_eq!(k.state().active_index(), 1);
        assert_eq!(k.button_state(), ButtonState::LongPressDone);
    }

    #[test]
    fn into_io_returns_handles() {
        let mut k = knob(Configuration::default());
        k.io_mut().encoder.rotate(1);
        k.poll(0);
        let io = k.into_io();
        assert_eq!(io.hid.events.len(), 1);
    }
}
