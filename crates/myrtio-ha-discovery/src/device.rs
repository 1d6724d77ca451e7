//! Home Assistant Device representation
//!
//! A Device represents the physical unit that exposes one or more entities.
//! Every entity embeds the serialized device in its discovery document, so
//! Home Assistant groups them under a single device card.

use heapless::Vec;

use crate::config::DEVICE_JSON_CAPACITY;
use crate::error::HaError;
use crate::ha::HaDeviceInfo;

/// Serialized device descriptor, ready to be embedded verbatim
pub type DeviceJson = Vec<u8, DEVICE_JSON_CAPACITY>;

/// Device information for Home Assistant
///
/// This is the domain representation of a device. It is converted to
/// [`HaDeviceInfo`] for serialization in discovery messages.
#[derive(Debug, Clone)]
pub struct Device<'a> {
    /// Stable unique identifier (used in `unique_id` of every entity)
    pub id: &'a str,
    /// Human-readable device name
    pub name: &'a str,
    /// Manufacturer name (optional)
    pub manufacturer: Option<&'a str>,
    /// Model name (optional)
    pub model: Option<&'a str>,
    /// Software version (optional)
    pub sw_version: Option<&'a str>,
}

impl<'a> Device<'a> {
    /// Create a new device with the given ID and name
    pub const fn new(id: &'a str, name: &'a str) -> Self {
        Self {
            id,
            name,
            manufacturer: None,
            model: None,
            sw_version: None,
        }
    }

    /// Set manufacturer
    #[must_use]
    pub const fn with_manufacturer(mut self, manufacturer: &'a str) -> Self {
        self.manufacturer = Some(manufacturer);
        self
    }

    /// Set model
    #[must_use]
    pub const fn with_model(mut self, model: &'a str) -> Self {
        self.model = Some(model);
        self
    }

    /// Set software version
    #[must_use]
    pub const fn with_sw_version(mut self, sw_version: &'a str) -> Self {
        self.sw_version = Some(sw_version);
        self
    }

    /// Serialize the device into its compact JSON fragment.
    ///
    /// Fails with [`HaError::InvalidDevice`] when the device has no id or
    /// the fragment does not fit into [`DEVICE_JSON_CAPACITY`].
    pub fn to_json(&self) -> Result<DeviceJson, HaError> {
        if self.id.is_empty() {
            return Err(HaError::InvalidDevice);
        }

        let info = HaDeviceInfo::from(self);
        serde_json_core::to_vec(&info).map_err(|_| HaError::InvalidDevice)
    }
}

impl<'a> From<&Device<'a>> for HaDeviceInfo<'a> {
    fn from(device: &Device<'a>) -> Self {
        HaDeviceInfo {
            identifiers: device.id,
            name: (!device.name.is_empty()).then_some(device.name),
            manufacturer: device.manufacturer,
            model: device.model,
            sw_version: device.sw_version,
        }
    }
}
