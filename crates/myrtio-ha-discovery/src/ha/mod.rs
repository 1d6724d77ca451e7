//! Home Assistant wire-format types
//!
//! This module contains the abbreviated keys, topic suffixes and payload
//! literals expected by the Home Assistant MQTT integration for discovery,
//! state, and commands.

pub mod command;
pub mod discovery;
pub mod state;

pub use command::{decode_bool, parse_number};
pub use discovery::{HaDeviceInfo, keys, suffix};
pub use state::{
    AVAILABILITY_OFFLINE, AVAILABILITY_ONLINE, STATE_OFF, STATE_ON, TemperatureStr,
    availability_payload, bool_payload, format_temperature, is_valid_temperature,
};
