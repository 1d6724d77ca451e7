//! Home Assistant discovery payload structures
//!
//! Home Assistant accepts abbreviated keys in discovery documents. The
//! abbreviations are used everywhere to keep payloads small.

use serde::Serialize;

/// Device information embedded in every discovery document
#[derive(Debug, Clone, Serialize)]
pub struct HaDeviceInfo<'a> {
    /// Device identifier
    #[serde(rename = "ids")]
    pub identifiers: &'a str,
    /// Human-readable device name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    /// Manufacturer name (optional)
    #[serde(rename = "mf", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<&'a str>,
    /// Model name (optional)
    #[serde(rename = "mdl", skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    /// Software version (optional)
    #[serde(rename = "sw", skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<&'a str>,
}

/// Abbreviated discovery document keys
pub mod keys {
    pub const NAME: &str = "name";
    pub const UNIQUE_ID: &str = "uniq_id";
    pub const DEVICE: &str = "dev";
    pub const AVAILABILITY_TOPIC: &str = "avty_t";
    pub const STATE_TOPIC: &str = "stat_t";
    pub const COMMAND_TOPIC: &str = "cmd_t";
    pub const DEVICE_CLASS: &str = "dev_cla";
    pub const ICON: &str = "ic";

    pub const ACTION_TOPIC: &str = "act_t";
    pub const AUX_COMMAND_TOPIC: &str = "aux_cmd_t";
    pub const AUX_STATE_TOPIC: &str = "aux_stat_t";
    pub const AWAY_MODE_COMMAND_TOPIC: &str = "away_mode_cmd_t";
    pub const AWAY_MODE_STATE_TOPIC: &str = "away_mode_stat_t";
    pub const HOLD_COMMAND_TOPIC: &str = "hold_cmd_t";
    pub const HOLD_STATE_TOPIC: &str = "hold_stat_t";
    pub const CURRENT_TEMPERATURE_TOPIC: &str = "curr_temp_t";
    pub const TEMPERATURE_COMMAND_TOPIC: &str = "temp_cmd_t";
    pub const TEMPERATURE_STATE_TOPIC: &str = "temp_stat_t";
    pub const MIN_TEMP: &str = "min_temp";
    pub const MAX_TEMP: &str = "max_temp";
    pub const TEMP_STEP: &str = "temp_step";
    pub const TEMP_UNIT: &str = "temp_unit";
}

/// Topic suffixes, the last segment of every entity topic
pub mod suffix {
    pub const CONFIG: &str = "config";
    pub const AVAILABILITY: &str = "avty_t";
    pub const STATE: &str = "stat_t";
    pub const COMMAND: &str = "cmd_t";

    pub const ACTION: &str = "at";
    pub const AUX_COMMAND: &str = "act";
    pub const AUX_STATE: &str = "ast";
    pub const AWAY_COMMAND: &str = "amct";
    pub const AWAY_STATE: &str = "amst";
    pub const HOLD_COMMAND: &str = "hct";
    pub const HOLD_STATE: &str = "hst";
    pub const TARGET_TEMPERATURE_COMMAND: &str = "ttct";
    pub const TARGET_TEMPERATURE_STATE: &str = "ttst";
    pub const CURRENT_TEMPERATURE: &str = "ctt";
}
