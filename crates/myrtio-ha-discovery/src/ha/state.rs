//! Home Assistant state payloads
//!
//! State messages are plain strings, not JSON documents.

use core::fmt::Write;

use heapless::String;

use crate::config::TEMPERATURE_STR_CAPACITY;
use crate::error::HaError;

pub const STATE_ON: &str = "ON";
pub const STATE_OFF: &str = "OFF";
pub const AVAILABILITY_ONLINE: &str = "online";
pub const AVAILABILITY_OFFLINE: &str = "offline";

/// Formatted temperature value
pub type TemperatureStr = String<TEMPERATURE_STR_CAPACITY>;

/// Payload for a boolean state
pub const fn bool_payload(state: bool) -> &'static str {
    if state { STATE_ON } else { STATE_OFF }
}

/// Payload for an availability state
pub const fn availability_payload(online: bool) -> &'static str {
    if online {
        AVAILABILITY_ONLINE
    } else {
        AVAILABILITY_OFFLINE
    }
}

/// Check that a temperature lies in the open interval (-255, 255)
pub fn is_valid_temperature(value: f32) -> bool {
    value.is_finite() && value > -255.0 && value < 255.0
}

/// Format a temperature with up to two fractional digits.
///
/// Trailing zeros and a dangling decimal point are trimmed, so `21.50`
/// becomes `21.5` and `20.00` becomes `20`.
pub fn format_temperature(value: f32) -> Result<TemperatureStr, HaError> {
    if !value.is_finite() {
        return Err(HaError::InvalidValue);
    }

    let mut out = TemperatureStr::new();
    write!(out, "{:.2}", value).map_err(|_| HaError::Serialization)?;

    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out.as_str() == "-0" {
        out.clear();
        out.push('0').map_err(|_| HaError::Serialization)?;
    }

    Ok(out)
}
