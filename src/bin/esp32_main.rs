//! ESP32-S3 rotary knob firmware.
//!
//! This is the main entry point for the physical controller. It runs a
//! 100Hz control loop that:
//! - Drains the USB serial command port (`REBOOT` from the host tool)
//! - Reads the rotary encoder and push button (sampled on their own thread)
//! - Turns gestures into keyboard, media and mouse HID reports
//!
//! # Hardware Setup
//!
//! Encoder A/B/SW on GPIO4/5/6 (see `rs_knob::hal::esp32::pins`), USB on the
//! native OTG port. The host sees a keyboard/mouse, a serial port and a small
//! drive holding `profiles.json`.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/xtensa-esp32s3-espidf/release/esp32_main
//! ```

use std::thread;
use std::time::Duration;

use esp_idf_hal::delay::Delay;
use esp_idf_hal::peripherals::Peripherals;
use tracing::{debug, error, info, warn};

use rs_knob::config::{self, FileSource, DEVICE_CONFIG_PATH};
use rs_knob::controller::{KnobController, KnobIo, LOOP_PERIOD_MS};
use rs_knob::hal::esp32::{esp32_encoder, mount_storage, Esp32Clock, Esp32Hid, Esp32Reset, Esp32Serial};
use rs_knob::hal::{SampledEncoder, DEFAULT_SAMPLE_PERIOD};
use rs_knob::traits::Clock;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .without_time()
        .init();

    println!();
    println!("================================");
    println!("  rs-knob Rotary HID Controller");
    println!("================================");
    println!();

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Load Configuration (before USB: the host takes the drive once mounted)
    // =========================================================================
    if let Err(e) = mount_storage() {
        warn!(error = %e, "storage mount failed");
    }
    let loaded = config::load_detailed(&mut FileSource::new(DEVICE_CONFIG_PATH));
    println!(
        "[OK] Configuration: {} profiles, {:?}",
        loaded.config.profiles.len(),
        loaded.origin
    );

    // =========================================================================
    // Initialize USB HID (fatal if it fails)
    // =========================================================================
    let hid = match Esp32Hid::new() {
        Ok(hid) => {
            println!("[OK] USB HID initialized");
            hid
        }
        Err(e) => {
            error!(error = %e, "USB HID init failed, halting");
            loop {
                thread::sleep(Duration::from_secs(1));
            }
        }
    };

    let channel = match Esp32Serial::new() {
        Ok(serial) => {
            println!("[OK] Command port initialized (CDC-ACM)");
            Some(serial)
        }
        Err(e) => {
            warn!(error = %e, "command port unavailable, remote reboot disabled");
            None
        }
    };

    // =========================================================================
    // Initialize Encoder (GPIO4/5/6)
    // =========================================================================
    let encoder = esp32_encoder(
        peripherals.pins.gpio4,
        peripherals.pins.gpio5,
        peripherals.pins.gpio6,
    )?;
    let encoder = SampledEncoder::spawn(encoder, DEFAULT_SAMPLE_PERIOD)?;
    println!("[OK] Encoder initialized (GPIO4/5/6, sampled every 1 ms)");

    let io = KnobIo {
        encoder,
        hid,
        channel,
        reset: Esp32Reset,
        delay: Delay::new_default(),
    };
    let mut knob = KnobController::new(io, loaded.config);
    let clock = Esp32Clock::new();

    info!(
        profile = knob.state().active_index() + 1,
        "starting control loop"
    );

    // =========================================================================
    // Main Control Loop
    // =========================================================================
    loop {
        let outcome = knob.poll(clock.now_ms());
        if let (Some(gesture), Some(result)) = (outcome.gesture, outcome.dispatched) {
            debug!(gesture = gesture.key(), ?result, "gesture");
        }
        thread::sleep(Duration::from_millis(u64::from(LOOP_PERIOD_MS)));
    }
}
