//! TinyUSB composite HID transport.
//!
//! One HID interface carries three report IDs:
//!
//! | ID | Report | Bytes |
//! |----|--------|-------|
//! | 1 | Boot keyboard | 8 |
//! | 2 | Consumer control | 2 |
//! | 3 | Mouse with wheel and pan | 5 |
//!
//! A CDC-ACM interface shares the device for host commands (see
//! [`super::Esp32Serial`]), and a mass-storage interface exposes the
//! configuration volume (see [`super::mount_storage`]). Installing the driver
//! is the only fatal step of firmware start-up.

use core::ffi::{c_char, c_void};
use std::time::Duration;

use esp_idf_sys::{esp, tinyusb_config_t, tinyusb_driver_install, tusb_desc_device_t, EspError};
use thiserror::Error;
use tracing::info;

use crate::keycodes::{ConsumerCode, Keycode};
use crate::report::{ConsumerReport, KeyboardReport, MouseReport};
use crate::traits::{HidTransport, MouseButton};
use crate::usb_ids;

const REPORT_ID_KEYBOARD: u8 = 1;
const REPORT_ID_CONSUMER: u8 = 2;
const REPORT_ID_MOUSE: u8 = 3;

/// HID interface index within the TinyUSB HID class.
const HID_INSTANCE: u8 = 0;

/// How long to wait for the previous report to leave the endpoint.
const READY_TIMEOUT_MS: u32 = 20;

// ============================================================================
// Descriptors
// ============================================================================

#[rustfmt::skip]
static REPORT_DESCRIPTOR: [u8; 143] = [
    // Keyboard
    0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, 0x85, REPORT_ID_KEYBOARD,
    0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25, 0x01, 0x95, 0x08, 0x75, 0x01, 0x81, 0x02,
    0x95, 0x01, 0x75, 0x08, 0x81, 0x01,
    0x95, 0x06, 0x75, 0x08, 0x15, 0x00, 0x26, 0xFF, 0x00, 0x05, 0x07, 0x19, 0x00, 0x2A, 0xFF, 0x00, 0x81, 0x00,
    0xC0,
    // Consumer control
    0x05, 0x0C, 0x09, 0x01, 0xA1, 0x01, 0x85, REPORT_ID_CONSUMER,
    0x15, 0x00, 0x26, 0xFF, 0x03, 0x19, 0x00, 0x2A, 0xFF, 0x03, 0x75, 0x10, 0x95, 0x01, 0x81, 0x00,
    0xC0,
    // Mouse
    0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, 0x85, REPORT_ID_MOUSE, 0x09, 0x01, 0xA1, 0x00,
    0x05, 0x09, 0x19, 0x01, 0x29, 0x05, 0x15, 0x00, 0x25, 0x01, 0x95, 0x05, 0x75, 0x01, 0x81, 0x02,
    0x95, 0x01, 0x75, 0x03, 0x81, 0x01,
    0x05, 0x01, 0x09, 0x30, 0x09, 0x31, 0x09, 0x38, 0x15, 0x81, 0x25, 0x7F, 0x75, 0x08, 0x95, 0x03, 0x81, 0x06,
    0x05, 0x0C, 0x0A, 0x38, 0x02, 0x15, 0x81, 0x25, 0x7F, 0x75, 0x08, 0x95, 0x01, 0x81, 0x06,
    0xC0, 0xC0,
];

const REPORT_DESCRIPTOR_LEN: u16 = REPORT_DESCRIPTOR.len() as u16;

/// Interfaces: CDC control (0), CDC data (1), HID (2), mass storage (3).
const CONFIG_TOTAL_LEN: u16 = 9 + 66 + 25 + 23;

#[rustfmt::skip]
static CONFIGURATION_DESCRIPTOR: [u8; CONFIG_TOTAL_LEN as usize] = [
    // Configuration: 4 interfaces, bus powered, 100 mA
    0x09, 0x02, CONFIG_TOTAL_LEN as u8, (CONFIG_TOTAL_LEN >> 8) as u8, 0x04, 0x01, 0x00, 0x80, 50,

    // CDC: interface association
    0x08, 0x0B, 0x00, 0x02, 0x02, 0x02, 0x00, 0x04,
    // CDC control interface
    0x09, 0x04, 0x00, 0x00, 0x01, 0x02, 0x02, 0x00, 0x04,
    // Header, call management, ACM, union functional descriptors
    0x05, 0x24, 0x00, 0x20, 0x01,
    0x05, 0x24, 0x01, 0x00, 0x01,
    0x04, 0x24, 0x02, 0x02,
    0x05, 0x24, 0x06, 0x00, 0x01,
    // Notification endpoint 0x81, interrupt, 8 bytes, 16 ms
    0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x10,
    // CDC data interface
    0x09, 0x04, 0x01, 0x00, 0x02, 0x0A, 0x00, 0x00, 0x00,
    // Data OUT 0x02 / IN 0x82, bulk, 64 bytes
    0x07, 0x05, 0x02, 0x02, 0x40, 0x00, 0x00,
    0x07, 0x05, 0x82, 0x02, 0x40, 0x00, 0x00,

    // HID interface, no boot subclass
    0x09, 0x04, 0x02, 0x00, 0x01, 0x03, 0x00, 0x00, 0x05,
    // HID descriptor
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22,
    REPORT_DESCRIPTOR_LEN as u8, (REPORT_DESCRIPTOR_LEN >> 8) as u8,
    // Report IN 0x83, interrupt, 16 bytes, 5 ms
    0x07, 0x05, 0x83, 0x03, 0x10, 0x00, 0x05,

    // Mass storage interface: SCSI transparent, bulk-only transport
    0x09, 0x04, 0x03, 0x00, 0x02, 0x08, 0x06, 0x50, 0x06,
    // Bulk OUT 0x04 / IN 0x84, 64 bytes
    0x07, 0x05, 0x04, 0x02, 0x40, 0x00, 0x00,
    0x07, 0x05, 0x84, 0x02, 0x40, 0x00, 0x00,
];

static DEVICE_DESCRIPTOR: tusb_desc_device_t = tusb_desc_device_t {
    bLength: 18,
    bDescriptorType: 0x01,
    bcdUSB: 0x0200,
    // Miscellaneous / IAD, required for the CDC association
    bDeviceClass: 0xEF,
    bDeviceSubClass: 0x02,
    bDeviceProtocol: 0x01,
    bMaxPacketSize0: 64,
    idVendor: usb_ids::VENDOR_ID,
    idProduct: usb_ids::PRODUCT_ID,
    bcdDevice: usb_ids::DEVICE_RELEASE,
    iManufacturer: 0x01,
    iProduct: 0x02,
    iSerialNumber: 0x03,
    bNumConfigurations: 0x01,
};

/// String table; index 0 is the language ID (US English).
struct StringTable([*const c_char; 7]);

// Pointers into static C strings only.
unsafe impl Sync for StringTable {}

static STRINGS: StringTable = StringTable([
    c"\x09\x04".as_ptr(),
    c"rs-knob".as_ptr(),
    c"Rotary Knob".as_ptr(),
    c"000001".as_ptr(),
    c"Knob Commands".as_ptr(),
    c"Knob HID".as_ptr(),
    c"Knob Storage".as_ptr(),
]);

// ============================================================================
// TinyUSB callbacks
// ============================================================================

#[no_mangle]
extern "C" fn tud_hid_descriptor_report_cb(_instance: u8) -> *const u8 {
    REPORT_DESCRIPTOR.as_ptr()
}

#[no_mangle]
extern "C" fn tud_hid_get_report_cb(
    _instance: u8,
    _report_id: u8,
    _report_type: esp_idf_sys::hid_report_type_t,
    _buffer: *mut u8,
    _reqlen: u16,
) -> u16 {
    0
}

#[no_mangle]
extern "C" fn tud_hid_set_report_cb(
    _instance: u8,
    _report_id: u8,
    _report_type: esp_idf_sys::hid_report_type_t,
    _buffer: *const u8,
    _bufsize: u16,
) {
}

// ============================================================================
// Transport
// ============================================================================

/// HID write failure.
#[derive(Debug, Error)]
pub enum Esp32HidError {
    /// The host has not configured the device (unplugged or suspended).
    #[error("USB device not mounted")]
    NotMounted,
    /// The previous report did not leave the endpoint in time.
    #[error("HID endpoint busy")]
    Busy,
    /// TinyUSB refused the report.
    #[error("HID report {0} rejected")]
    Rejected(u8),
}

/// Keyboard, consumer-control and mouse output over TinyUSB.
pub struct Esp32Hid {
    held: KeyboardReport,
}

impl Esp32Hid {
    /// Install the TinyUSB driver with the composite descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot be installed. There is no HID
    /// output without it.
    pub fn new() -> Result<Self, EspError> {
        let mut config = tinyusb_config_t::default();
        config.__bindgen_anon_1.device_descriptor = &DEVICE_DESCRIPTOR;
        config.string_descriptor = STRINGS.0.as_ptr() as *mut *const c_char;
        config.string_descriptor_count = STRINGS.0.len() as i32;
        config.external_phy = false;
        config.__bindgen_anon_2.configuration_descriptor = CONFIGURATION_DESCRIPTOR.as_ptr();

        esp!(unsafe { tinyusb_driver_install(&config) })?;
        info!(
            vid = usb_ids::VENDOR_ID,
            pid = usb_ids::PRODUCT_ID,
            "USB HID installed"
        );
        Ok(Self {
            held: KeyboardReport::empty(),
        })
    }

    fn wait_ready(&self) -> Result<(), Esp32HidError> {
        if !unsafe { esp_idf_sys::tud_mounted() } {
            return Err(Esp32HidError::NotMounted);
        }
        for _ in 0..READY_TIMEOUT_MS {
            if unsafe { esp_idf_sys::tud_hid_n_ready(HID_INSTANCE) } {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Err(Esp32HidError::Busy)
    }

    fn send_report(&mut self, id: u8, bytes: &[u8]) -> Result<(), Esp32HidError> {
        self.wait_ready()?;
        let sent = unsafe {
            esp_idf_sys::tud_hid_n_report(
                HID_INSTANCE,
                id,
                bytes.as_ptr() as *const c_void,
                bytes.len() as u16,
            )
        };
        if sent {
            Ok(())
        } else {
            Err(Esp32HidError::Rejected(id))
        }
    }
}

impl HidTransport for Esp32Hid {
    type Error = Esp32HidError;

    fn send_consumer(&mut self, code: ConsumerCode) -> Result<(), Esp32HidError> {
        self.send_report(REPORT_ID_CONSUMER, &ConsumerReport::pressed(code).to_bytes())?;
        self.send_report(REPORT_ID_CONSUMER, &ConsumerReport::released().to_bytes())
    }

    fn press_keys(&mut self, keys: &[Keycode]) -> Result<(), Esp32HidError> {
        let (report, dropped) = KeyboardReport::from_keys(keys);
        if dropped > 0 {
            tracing::warn!(dropped, "more than six keys held, extra keys dropped");
        }
        self.held = report;
        let bytes = self.held.to_bytes();
        self.send_report(REPORT_ID_KEYBOARD, &bytes)
    }

    fn release_all(&mut self) -> Result<(), Esp32HidError> {
        self.held = KeyboardReport::empty();
        let bytes = self.held.to_bytes();
        self.send_report(REPORT_ID_KEYBOARD, &bytes)
    }

    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8, pan: i8) -> Result<(), Esp32HidError> {
        self.send_report(REPORT_ID_MOUSE, &MouseReport::motion(x, y, wheel, pan).to_bytes())
    }

    fn mouse_click(&mut self, button: MouseButton) -> Result<(), Esp32HidError> {
        self.send_report(REPORT_ID_MOUSE, &MouseReport::button(button).to_bytes())?;
        self.send_report(REPORT_ID_MOUSE, &MouseReport::default().to_bytes())
    }
}
