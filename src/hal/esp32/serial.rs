//! Host command channel over the TinyUSB CDC-ACM interface.
//!
//! Requires [`super::Esp32Hid::new`] to have installed the USB driver first.

use esp_idf_sys::{
    esp, tinyusb_cdcacm_init, tinyusb_cdcacm_itf_t_TINYUSB_CDC_ACM_0, tinyusb_cdcacm_read,
    tinyusb_config_cdcacm_t, tinyusb_usbdev_t_TINYUSB_USBDEV_0, EspError,
};

use crate::traits::CommandChannel;

/// Read chunk size; commands are a handful of bytes.
const CHUNK: usize = 64;

/// Non-blocking reader for the CDC-ACM port.
pub struct Esp32Serial {
    chunk: [u8; CHUNK],
}

impl Esp32Serial {
    /// Initialize CDC-ACM port 0.
    pub fn new() -> Result<Self, EspError> {
        let mut config = tinyusb_config_cdcacm_t::default();
        config.usb_dev = tinyusb_usbdev_t_TINYUSB_USBDEV_0;
        config.cdc_port = tinyusb_cdcacm_itf_t_TINYUSB_CDC_ACM_0;
        esp!(unsafe { tinyusb_cdcacm_init(&config) })?;
        Ok(Self { chunk: [0; CHUNK] })
    }
}

impl CommandChannel for Esp32Serial {
    type Error = EspError;

    fn read_available(&mut self, buf: &mut Vec<u8>) -> Result<usize, EspError> {
        let mut total = 0;
        loop {
            let mut got: usize = 0;
            esp!(unsafe {
                tinyusb_cdcacm_read(
                    tinyusb_cdcacm_itf_t_TINYUSB_CDC_ACM_0,
                    self.chunk.as_mut_ptr(),
                    CHUNK,
                    &mut got,
                )
            })?;
            if got == 0 {
                return Ok(total);
            }
            buf.extend_from_slice(&self.chunk[..got]);
            total += got;
        }
    }
}
