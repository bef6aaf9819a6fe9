//! Rotary encoder on ESP32 GPIO.
//!
//! The decoding lives in [`QuadratureEncoder`]; this module only configures
//! the pins. EC11 and KY-040 outputs are open-drain, so all three inputs get
//! the internal pull-up.
//!
//! # Wiring
//!
//! - A → GPIO4
//! - B → GPIO5
//! - SW → GPIO6
//! - C / GND → GND

use esp_idf_hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_sys::EspError;

use crate::hal::QuadratureEncoder;

/// Quadrature encoder over ESP-IDF pin drivers.
pub type Esp32Encoder<'d, A, B, SW> =
    QuadratureEncoder<PinDriver<'d, A, Input>, PinDriver<'d, B, Input>, PinDriver<'d, SW, Input>>;

/// Configure three GPIOs as pulled-up inputs and wrap them in a decoder.
///
/// # Example
///
/// ```ignore
/// let peripherals = Peripherals::take()?;
/// let mut encoder = esp32_encoder(
///     peripherals.pins.gpio4, // A
///     peripherals.pins.gpio5, // B
///     peripherals.pins.gpio6, // SW
/// )?;
/// ```
///
/// # Errors
///
/// Returns an error if GPIO initialization fails.
pub fn esp32_encoder<'d, A, B, SW>(
    a_pin: impl Peripheral<P = A> + 'd,
    b_pin: impl Peripheral<P = B> + 'd,
    sw_pin: impl Peripheral<P = SW> + 'd,
) -> Result<Esp32Encoder<'d, A, B, SW>, EspError>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
    SW: InputPin + OutputPin,
{
    let mut a = PinDriver::input(a_pin)?;
    let mut b = PinDriver::input(b_pin)?;
    let mut sw = PinDriver::input(sw_pin)?;

    a.set_pull(Pull::Up)?;
    b.set_pull(Pull::Up)?;
    sw.set_pull(Pull::Up)?;

    Ok(QuadratureEncoder::new(a, b, sw))
}
