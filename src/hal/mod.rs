//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `quadrature`: Polled quadrature decoder over any `embedded-hal` input pins
//! - `sampled`: Runs any encoder on its own sampling thread
//! - `esp32`: ESP32-S3 with native USB (requires `esp32` feature)

pub mod mock;
pub mod quadrature;
pub mod sampled;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;
pub use quadrature::{QuadratureEncoder, DEFAULT_DIVISOR};
pub use sampled::{SampledEncoder, DEFAULT_SAMPLE_PERIOD};

#[cfg(feature = "esp32")]
pub use esp32::*;
