//! Integration tests for the two-pass discovery document encoder.

use myrtio_ha_discovery::serializer::{
    calculate_serialized_length, write_escaped, write_serialized_data,
};
use myrtio_ha_discovery::{
    Device, DiscoveryDocument, Field, HaError, JsonSink, LengthCounter, SliceWriter, TopicPath,
};

/// Minimal document exercising every field kind
struct TestDocument<'a> {
    name: &'a str,
    object_id: &'a str,
    device_id: &'a str,
    icon: Option<&'a str>,
    min_temp: Option<f32>,
    availability: bool,
}

impl<'a> TestDocument<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            object_id: "sensor1",
            device_id: "dev1",
            icon: None,
            min_temp: None,
            availability: false,
        }
    }

    fn path(&self) -> TopicPath<'a> {
        TopicPath::new("homeassistant", "sensor", self.object_id)
    }
}

impl DiscoveryDocument for TestDocument<'_> {
    fn visit_fields(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        visit(Field::Name(self.name))?;
        visit(Field::UniqueId {
            device_id: self.device_id,
            object_id: self.object_id,
        })?;
        visit(Field::Topic {
            key: "stat_t",
            path: self.path(),
            suffix: "stat_t",
        })?;
        if let Some(icon) = self.icon {
            visit(Field::Str {
                key: "ic",
                value: icon,
            })?;
        }
        if let Some(value) = self.min_temp {
            visit(Field::Number {
                key: "min_temp",
                value,
            })?;
        }
        if self.availability {
            visit(Field::Availability(self.path()))?;
        }
        visit(Field::Device(device_json))
    }
}

fn device_json() -> Vec<u8> {
    Device::new("dev1", "Test device").to_json().unwrap().to_vec()
}

/// Render through both passes and check they agree
fn render(document: &TestDocument<'_>) -> String {
    let device = device_json();
    let expected = calculate_serialized_length(document, &device).unwrap();

    let mut buf = vec![0_u8; expected];
    let mut writer = SliceWriter::new(&mut buf);
    write_serialized_data(document, &device, &mut writer).unwrap();
    assert_eq!(writer.position(), expected);

    String::from_utf8(buf).unwrap()
}

// -----------------------------------------------------------------------------
// Length contract
// -----------------------------------------------------------------------------

#[test]
fn calculated_length_matches_written_document() {
    let json = render(&TestDocument::new("Outdoor"));

    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["name"], "Outdoor");
    assert_eq!(doc["uniq_id"], "dev1_sensor1");
    assert_eq!(doc["stat_t"], "homeassistant/sensor/sensor1/stat_t");
    assert_eq!(doc["dev"]["ids"], "dev1");
    assert_eq!(doc["dev"]["name"], "Test device");
}

#[test]
fn escaping_is_included_in_length() {
    let mut document = TestDocument::new("Say \"hi\"\\\n\u{1}");
    document.icon = Some("mdi:tab\tbed");
    let json = render(&document);

    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["name"], "Say \"hi\"\\\n\u{1}");
    assert_eq!(doc["ic"], "mdi:tab\tbed");
    assert!(json.contains(r#""name":"Say \"hi\"\\\n\u0001""#));
}

#[test]
fn optional_fields_change_length_consistently() {
    let mut document = TestDocument::new("Outdoor");
    let bare = render(&document).len();

    document.min_temp = Some(16.5);
    document.availability = true;
    let json = render(&document);

    assert!(json.len() > bare);
    assert!(json.contains(r#","min_temp":16.5,"#));
    assert!(json.contains(r#""avty_t":"homeassistant/sensor/sensor1/avty_t""#));
}

#[test]
fn field_length_matches_written_field() {
    let path = TopicPath::new("homeassistant", "climate", "hvac");
    let fields = [
        Field::Name("Living room"),
        Field::UniqueId {
            device_id: "dev1",
            object_id: "hvac",
        },
        Field::Topic {
            key: "act_t",
            path,
            suffix: "at",
        },
        Field::Availability(path),
        Field::Number {
            key: "temp_step",
            value: 0.5,
        },
        Field::Str {
            key: "temp_unit",
            value: "C",
        },
    ];

    for first in [true, false] {
        for field in fields {
            let mut counter = LengthCounter::new();
            field.write(&mut counter, first).unwrap();
            assert_eq!(field.calculate_len(first).unwrap(), counter.len());
        }
    }
}

// -----------------------------------------------------------------------------
// Field rules
// -----------------------------------------------------------------------------

#[test]
fn empty_name_is_omitted_without_leading_comma() {
    let json = render(&TestDocument::new(""));

    assert!(json.starts_with(r#"{"uniq_id":"dev1_sensor1","#));

    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(doc.get("name").is_none());
    assert_eq!(doc["dev"]["name"], "Test device");
}

#[test]
fn topic_values_are_escaped() {
    let mut document = TestDocument::new("Outdoor");
    document.object_id = "a\"b\\c";
    document.availability = true;
    let json = render(&document);

    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["uniq_id"], "dev1_a\"b\\c");
    assert_eq!(doc["stat_t"], "homeassistant/sensor/a\"b\\c/stat_t");
    assert_eq!(doc["avty_t"], "homeassistant/sensor/a\"b\\c/avty_t");
}

#[test]
fn leading_comma_only_after_first_field() {
    let field = Field::Str {
        key: "ic",
        value: "mdi:fan",
    };

    let mut first = vec![0_u8; field.calculate_len(true).unwrap()];
    field.write(&mut SliceWriter::new(&mut first), true).unwrap();
    assert_eq!(first, br#""ic":"mdi:fan""#);

    let mut next = vec![0_u8; field.calculate_len(false).unwrap()];
    field.write(&mut SliceWriter::new(&mut next), false).unwrap();
    assert_eq!(next, br#","ic":"mdi:fan""#);
}

#[test]
fn whole_numbers_are_written_without_fraction() {
    let field = Field::Number {
        key: "temp_step",
        value: 1.0,
    };
    let mut buf = vec![0_u8; field.calculate_len(true).unwrap()];
    field.write(&mut SliceWriter::new(&mut buf), true).unwrap();

    assert_eq!(buf, br#""temp_step":1"#);
}

#[test]
fn missing_identity_fails_sizing() {
    let mut document = TestDocument::new("Outdoor");
    document.object_id = "";
    assert_eq!(
        calculate_serialized_length(&document, &device_json()),
        Err(HaError::MissingObjectId)
    );

    let mut document = TestDocument::new("Outdoor");
    document.device_id = "";
    assert_eq!(
        calculate_serialized_length(&document, &device_json()),
        Err(HaError::InvalidDevice)
    );
}

#[test]
fn empty_device_json_is_rejected() {
    assert_eq!(
        calculate_serialized_length(&TestDocument::new("Outdoor"), &[]),
        Err(HaError::InvalidDevice)
    );
}

// -----------------------------------------------------------------------------
// Sinks
// -----------------------------------------------------------------------------

#[test]
fn slice_writer_rejects_overflow() {
    let mut buf = [0_u8; 4];
    let mut writer = SliceWriter::new(&mut buf);

    assert_eq!(writer.put(b"abc"), Ok(()));
    assert_eq!(writer.put(b"de"), Err(HaError::Serialization));
    assert_eq!(writer.written(), b"abc");
}

#[test]
fn escaped_control_characters_use_unicode_form() {
    let mut counter = LengthCounter::new();
    write_escaped(&mut counter, "a\u{1f}b").unwrap();
    assert_eq!(counter.len(), "a\\u001fb".len());

    let mut buf = [0_u8; 8];
    let mut writer = SliceWriter::new(&mut buf);
    write_escaped(&mut writer, "a\u{1f}b").unwrap();
    assert_eq!(writer.written(), b"a\\u001fb");
}

// -----------------------------------------------------------------------------
// Device descriptor
// -----------------------------------------------------------------------------

#[test]
fn device_json_skips_absent_fields() {
    let json = Device::new("dev1", "").to_json().unwrap();
    assert_eq!(json.as_slice(), br#"{"ids":"dev1"}"#);
}

#[test]
fn device_json_uses_abbreviated_keys() {
    let device = Device::new("dev1", "Lamp")
        .with_manufacturer("MyrtIO")
        .with_model("ESP32")
        .with_sw_version("1.2.0");
    let json = device.to_json().unwrap();

    let doc: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(doc["ids"], "dev1");
    assert_eq!(doc["mf"], "MyrtIO");
    assert_eq!(doc["mdl"], "ESP32");
    assert_eq!(doc["sw"], "1.2.0");
}

#[test]
fn device_without_id_is_invalid() {
    assert_eq!(Device::new("", "Lamp").to_json(), Err(HaError::InvalidDevice));
}
