//! Home Assistant command payload decoding
//!
//! Commands arrive as short raw payloads, not JSON.

use heapless::String;

use crate::config::TEMPERATURE_STR_CAPACITY;
use crate::ha::state::STATE_ON;

/// Decode a boolean command.
///
/// Home Assistant sends exactly `ON` or `OFF`, so the payload length alone
/// tells them apart.
pub fn decode_bool(payload: &[u8]) -> bool {
    payload.len() == STATE_ON.len()
}

/// Permissive numeric parser for temperature commands.
///
/// Accepts surrounding whitespace, a leading sign, and either `.` or `,` as
/// decimal separator. Parsing stops at the first character that cannot
/// continue the number; trailing garbage is ignored. Leading zeros are
/// skipped and fraction digits beyond the buffer capacity are dropped.
/// Returns `None` when no digit is found or the integer part does not fit.
pub fn parse_number(payload: &[u8]) -> Option<f32> {
    let mut normalized: String<TEMPERATURE_STR_CAPACITY> = String::new();
    let mut seen_digit = false;
    let mut seen_separator = false;
    let mut significant = false;

    let trimmed = payload.trim_ascii();
    for (i, &byte) in trimmed.iter().enumerate() {
        let ch = match byte {
            b'+' | b'-' if i == 0 => byte as char,
            b'0' if !significant && !seen_separator => {
                seen_digit = true;
                continue;
            }
            b'0'..=b'9' => {
                seen_digit = true;
                significant = true;
                byte as char
            }
            b'.' | b',' if !seen_separator => {
                seen_separator = true;
                '.'
            }
            _ => break,
        };
        if normalized.push(ch).is_err() {
            if seen_separator {
                break;
            }
            return None;
        }
    }

    if !seen_digit {
        return None;
    }

    let number = normalized.trim_end_matches('.');
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        // only zeros
        return Some(0.0);
    }
    number.parse::<f32>().ok()
}
