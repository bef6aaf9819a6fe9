//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstractions that allow rs-knob to run on
//! the ESP32-S3 and against desktop mocks with the same controller code.
//!
//! # Submodules
//!
//! - `hardware`: Encoder input, clock, platform reset
//! - `hid`: Keyboard, consumer-control and mouse output
//! - `channel`: Host command side channel
//!
//! # Hardware Abstraction
//!
//! - [`EncoderInput`]: Rotary encoder position and button level
//! - [`Clock`]: Monotonic time source
//! - [`HidTransport`]: HID report output
//! - [`CommandChannel`]: Byte stream carrying `REBOOT` requests
//! - [`SystemReset`]: Hard restart

pub mod channel;
pub mod hardware;
pub mod hid;

pub use channel::*;
pub use hardware::*;
pub use hid::*;
