//! Integration tests for state and command payload helpers.

use myrtio_ha_discovery::HaError;
use myrtio_ha_discovery::ha::{
    availability_payload, bool_payload, decode_bool, format_temperature, is_valid_temperature,
    parse_number,
};

#[test]
fn bool_literals() {
    assert_eq!(bool_payload(true), "ON");
    assert_eq!(bool_payload(false), "OFF");
    assert_eq!(availability_payload(true), "online");
    assert_eq!(availability_payload(false), "offline");
}

#[test]
fn bool_command_is_decoded_by_length() {
    assert!(decode_bool(b"ON"));
    assert!(!decode_bool(b"OFF"));
    assert!(!decode_bool(b""));
}

#[test]
fn temperature_is_trimmed() {
    assert_eq!(format_temperature(21.5).unwrap().as_str(), "21.5");
    assert_eq!(format_temperature(20.0).unwrap().as_str(), "20");
    assert_eq!(format_temperature(-3.25).unwrap().as_str(), "-3.25");
    assert_eq!(format_temperature(0.1).unwrap().as_str(), "0.1");
    assert_eq!(format_temperature(-0.001).unwrap().as_str(), "0");
}

#[test]
fn non_finite_temperature_is_rejected() {
    assert_eq!(format_temperature(f32::NAN), Err(HaError::InvalidValue));
    assert_eq!(format_temperature(f32::INFINITY), Err(HaError::InvalidValue));
}

#[test]
fn temperature_range_is_open() {
    assert!(is_valid_temperature(254.9));
    assert!(is_valid_temperature(-254.9));
    assert!(!is_valid_temperature(255.0));
    assert!(!is_valid_temperature(-255.0));
    assert!(!is_valid_temperature(f32::NAN));
}

#[test]
fn number_parser_is_permissive() {
    assert_eq!(parse_number(b"21.5"), Some(21.5));
    assert_eq!(parse_number(b" 22 "), Some(22.0));
    assert_eq!(parse_number(b"23,5"), Some(23.5));
    assert_eq!(parse_number(b"-4"), Some(-4.0));
    assert_eq!(parse_number(b"+7."), Some(7.0));
    assert_eq!(parse_number(b"19.5C"), Some(19.5));
    assert_eq!(parse_number(b"1.2.3"), Some(1.2));
}

#[test]
fn number_parser_handles_long_input() {
    assert_eq!(parse_number(b"21.50000000000000"), Some(21.5));
    assert_eq!(parse_number(b"0000000000000000021"), Some(21.0));
    assert_eq!(parse_number(b"-0000000000000000004.25"), Some(-4.25));
    assert_eq!(parse_number(b"0.5"), Some(0.5));
    assert_eq!(parse_number(b"000"), Some(0.0));
    assert_eq!(parse_number(b"123456789012345678"), None);
}

#[test]
fn number_parser_needs_a_digit() {
    assert_eq!(parse_number(b""), None);
    assert_eq!(parse_number(b"abc"), None);
    assert_eq!(parse_number(b"-"), None);
    assert_eq!(parse_number(b"."), None);
}
