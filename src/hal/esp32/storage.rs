//! Configuration volume shared with the USB host.
//!
//! A wear-levelled FAT partition is mounted in the VFS at
//! [`STORAGE_BASE_PATH`] and exposed to the host as the mass-storage
//! interface of the composite device, so `knobctl deploy` writes the same
//! `profiles.json` the firmware reads.
//!
//! TinyUSB takes the volume away from the VFS while the host has it mounted.
//! Call [`mount_storage`] and load the configuration before installing the
//! USB driver; a new file takes effect on the next boot.

use esp_idf_sys::{
    esp, esp_partition_find_first, esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_DATA_FAT,
    esp_partition_type_t_ESP_PARTITION_TYPE_DATA, tinyusb_msc_spiflash_config_t,
    tinyusb_msc_storage_init_spiflash, tinyusb_msc_storage_mount, wl_handle_t, wl_mount, EspError,
    ESP_ERR_NOT_FOUND, WL_INVALID_HANDLE,
};
use tracing::info;

/// Where the configuration volume is mounted in the VFS.
pub const STORAGE_BASE_PATH: &str = "/data";

/// Register the `storage` FAT partition with TinyUSB mass storage and mount
/// it at [`STORAGE_BASE_PATH`].
///
/// A blank partition is formatted on first boot; the caller then finds no
/// configuration file and falls back to the built-in profiles.
///
/// # Errors
///
/// Returns an error if the partition is missing or cannot be mounted.
pub fn mount_storage() -> Result<(), EspError> {
    let partition = unsafe {
        esp_partition_find_first(
            esp_partition_type_t_ESP_PARTITION_TYPE_DATA,
            esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_DATA_FAT,
            c"storage".as_ptr(),
        )
    };
    if partition.is_null() {
        return Err(EspError::from_infallible::<ESP_ERR_NOT_FOUND>());
    }

    let mut wl_handle: wl_handle_t = WL_INVALID_HANDLE;
    esp!(unsafe { wl_mount(partition, &mut wl_handle) })?;

    let mut config = tinyusb_msc_spiflash_config_t::default();
    config.wl_handle = wl_handle;
    config.mount_config.format_if_mount_failed = true;
    config.mount_config.max_files = 4;
    esp!(unsafe { tinyusb_msc_storage_init_spiflash(&config) })?;
    esp!(unsafe { tinyusb_msc_storage_mount(c"/data".as_ptr()) })?;

    info!(path = STORAGE_BASE_PATH, "storage mounted");
    Ok(())
}
