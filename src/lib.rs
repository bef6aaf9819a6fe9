//! # rs-knob
//!
//! Firmware core for a rotary-encoder USB HID controller: a knob with a push
//! button whose gestures (turn, click, hold, hold-and-turn) are mapped to
//! keyboard, media and mouse events through switchable profiles.
//!
//! ## Features
//!
//! - **Gesture layering**: click, long press and shifted rotation from one button
//! - **Profiles**: at least three binding sets, cycled or selected by gesture
//! - **Macros**: arbitrary key combinations bound to any gesture
//! - **Sensitivity**: volume, scroll and mouse multipliers shared by all profiles
//! - **Tolerant configuration**: older file layouts are upgraded on load, bad
//!   files fall back to built-in defaults
//! - **Host tooling**: deploy a configuration and reboot the device (`host` feature)
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions (encoder, HID, command channel, reset)
//! - `gesture` - Button/rotation state machine
//! - `actions` - Action names and their HID effects
//! - `dispatch` - Runs bindings with repeat and spacing rules
//! - `config` - Configuration model, migration and loading
//! - `controller` - Main loop that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
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
//! let mut knob = KnobController::new(io, Configuration::default().with_sensitivity_volume(6));
//!
//! // One detent clockwise on the media profile: volume up, three pulses
//! knob.io_mut().encoder.rotate(1);
//! knob.poll(0);
//! assert_eq!(knob.io().hid.consumer_count(ConsumerCode::VOLUME_INCREMENT), 3);
//!
//! // Hold past the long-press threshold: next profile
//! knob.io_mut().encoder.set_button(true);
//! knob.poll(10);
//! knob.poll(900);
//! assert_eq!(knob.state().active_index(), 1);
//! ```

/// Action registry and HID effects.
pub mod actions;
/// Host command side channel.
pub mod command;
/// Configuration model, migration and loading.
pub mod config;
/// Main control loop.
pub mod controller;
/// Gesture-to-HID dispatch.
pub mod dispatch;
/// Error types.
pub mod error;
/// Button and rotation state machine.
pub mod gesture;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// HID usage codes.
pub mod keycodes;
/// HID report encoding.
pub mod report;
/// Active profile and loaded configuration.
pub mod state;
/// Core traits for hardware abstraction.
pub mod traits;
/// USB identifiers.
pub mod usb_ids;

/// Host-side deploy and reboot tooling.
#[cfg(feature = "host")]
pub mod host;

pub use config::{ActionObject, Configuration, GestureSlot, Profile};
pub use controller::{KnobController, KnobIo, PollOutcome};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{CommandError, ConfigError, HostError};
pub use gesture::{ButtonState, GestureMachine};
pub use state::RuntimeState;
