//! ESP32-S3 hardware abstraction layer for the rotary knob.
//!
//! This module provides hardware implementations for an ESP32-S3 board with
//! native USB, acting as a composite HID + CDC + mass-storage device.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-S3 (native USB OTG on GPIO19/20)
//! - **Encoder**: EC11 / KY-040 rotary encoder with push button
//! - **USB**: TinyUSB composite: keyboard + consumer control + mouse HID,
//!   one CDC-ACM port carrying host commands, and the configuration drive
//! - **Storage**: wear-levelled FAT partition mounted at `/data`, shared with
//!   the host over USB mass storage
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod clock;
mod encoder;
mod hid;
mod reset;
mod serial;
mod storage;

pub use clock::Esp32Clock;
pub use encoder::{esp32_encoder, Esp32Encoder};
pub use hid::{Esp32Hid, Esp32HidError};
pub use reset::Esp32Reset;
pub use serial::Esp32Serial;
pub use storage::{mount_storage, STORAGE_BASE_PATH};

/// Pin assignments for the ESP32-S3 knob board.
pub mod pins {
    // =========================================================================
    // Rotary Encoder
    // =========================================================================

    /// Encoder A signal
    pub const ENC_A: i32 = 4;

    /// Encoder B signal
    pub const ENC_B: i32 = 5;

    /// Encoder push button (active low)
    pub const ENC_SW: i32 = 6;

    // =========================================================================
    // USB (fixed by the on-chip PHY)
    // =========================================================================

    /// USB D-
    pub const USB_DM: i32 = 19;

    /// USB D+
    pub const USB_DP: i32 = 20;
}
