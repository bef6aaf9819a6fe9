//! USB identifiers the device enumerates with.
//!
//! The firmware builds its device descriptor from these and the host tools
//! use them to find the control port.

/// Espressif Systems vendor ID.
pub const VENDOR_ID: u16 = 0x303A;

/// Product ID for the knob firmware.
pub const PRODUCT_ID: u16 = 0x80F1;

/// Device release number (BCD).
pub const DEVICE_RELEASE: u16 = 0x0100;

/// Manufacturer string descriptor.
pub const MANUFACTURER: &str = "rs-knob";

/// Product string descriptor.
pub const PRODUCT: &str = "Rotary Knob";

/// True when `vid`/`pid` identify the knob.
pub const fn matches(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && pid == PRODUCT_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_knob() {
        assert!(matches(VENDOR_ID, PRODUCT_ID));
        assert!(!matches(VENDOR_ID, 0x1001));
        assert!(!matches(0x2E8A, PRODUCT_ID));
    }
}
