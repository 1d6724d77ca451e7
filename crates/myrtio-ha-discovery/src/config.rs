//! Constants and runtime configuration shared by every entity.

use crate::device::Device;

/// Discovery prefix Home Assistant listens on by default
pub const DEFAULT_DISCOVERY_PREFIX: &str = "homeassistant";

/// Maximum length for a topic string
pub const MAX_TOPIC_LEN: usize = 128;

/// Capacity of the buffer the device descriptor is serialized into
pub const DEVICE_JSON_CAPACITY: usize = 256;

/// Maximum number of observers a single entity can notify
pub const MAX_OBSERVERS: usize = 4;

/// Capacity for a formatted temperature value (`-254.99`)
pub const TEMPERATURE_STR_CAPACITY: usize = 16;

/// Discovery context handed to every entity at construction.
///
/// Holds the discovery prefix and the device all entities belong to.
#[derive(Debug, Clone, Copy)]
pub struct Discovery<'a> {
    /// Topic prefix, `homeassistant` unless configured otherwise
    pub prefix: &'a str,
    /// Device shared by every entity of the unit
    pub device: &'a Device<'a>,
}

impl<'a> Discovery<'a> {
    /// Create a discovery context with the default prefix
    pub const fn new(device: &'a Device<'a>) -> Self {
        Self {
            prefix: DEFAULT_DISCOVERY_PREFIX,
            device,
        }
    }

    /// Set a custom discovery prefix
    #[must_use]
    pub const fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }
}
