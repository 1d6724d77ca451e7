//! Two-pass discovery document encoder
//!
//! A discovery document is written twice: once into a [`LengthCounter`] to
//! learn its exact size, then into the transport after the message of that
//! size has been opened. Both passes run the same code against different
//! [`JsonSink`]s, and every document is described by a single field-visiting
//! function ([`DiscoveryDocument::visit_fields`]), so the calculated length
//! and the written bytes cannot disagree.

use crate::error::HaError;
use crate::ha::{format_temperature, keys};
use crate::topic::TopicPath;
use crate::transport::HaTransport;

/// Destination for encoded bytes
pub trait JsonSink {
    /// Append raw bytes
    fn put(&mut self, bytes: &[u8]) -> Result<(), HaError>;

    /// Append a string without escaping
    fn put_str(&mut self, s: &str) -> Result<(), HaError> {
        self.put(s.as_bytes())
    }
}

/// Sink that only counts bytes (the calculation pass)
#[derive(Debug, Default)]
pub struct LengthCounter {
    len: usize,
}

impl LengthCounter {
    pub const fn new() -> Self {
        Self { len: 0 }
    }

    /// Number of bytes counted so far
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl JsonSink for LengthCounter {
    fn put(&mut self, bytes: &[u8]) -> Result<(), HaError> {
        self.len += bytes.len();
        Ok(())
    }
}

/// Sink writing into a caller-provided buffer
pub struct SliceWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> SliceWriter<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The written part of the buffer
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl JsonSink for SliceWriter<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), HaError> {
        let end = self.pos + bytes.len();
        let Some(target) = self.buf.get_mut(self.pos..end) else {
            return Err(HaError::Serialization);
        };
        target.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Sink streaming into a message opened with `begin_publish`
pub struct TransportWriter<'t> {
    transport: &'t mut dyn HaTransport,
    written: usize,
}

impl<'t> TransportWriter<'t> {
    pub fn new(transport: &'t mut dyn HaTransport) -> Self {
        Self {
            transport,
            written: 0,
        }
    }

    /// Number of bytes handed to the transport so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl JsonSink for TransportWriter<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), HaError> {
        self.transport.write_bytes(bytes)?;
        self.written += bytes.len();
        Ok(())
    }
}

/// One field of a discovery document.
///
/// Each variant knows how to write itself including its JSON punctuation
/// (leading comma unless first, quoted key, colon, quoted value).
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    /// `"name":"…"`, omitted when empty
    Name(&'a str),
    /// `"uniq_id":"{device_id}_{object_id}"`
    UniqueId {
        device_id: &'a str,
        object_id: &'a str,
    },
    /// `"dev":{…}` with the serialized device embedded raw
    Device(&'a [u8]),
    /// `"avty_t":"…/avty_t"`
    Availability(TopicPath<'a>),
    /// `"key":"…"` with an escaped string value
    Str { key: &'static str, value: &'a str },
    /// `"key":"{prefix}/{component}/{object_id}/{suffix}"`
    Topic {
        key: &'static str,
        path: TopicPath<'a>,
        suffix: &'static str,
    },
    /// `"key":21.5`
    Number { key: &'static str, value: f32 },
}

impl Field<'_> {
    /// Whether the field produces any output
    pub fn is_present(&self) -> bool {
        match self {
            Field::Name(name) => !name.is_empty(),
            _ => true,
        }
    }

    /// Exact number of bytes [`write`](Field::write) emits for this field
    pub fn calculate_len(&self, first: bool) -> Result<usize, HaError> {
        let mut counter = LengthCounter::new();
        self.write(&mut counter, first)?;
        Ok(counter.len())
    }

    /// Write the field
    pub fn write<S: JsonSink + ?Sized>(&self, sink: &mut S, first: bool) -> Result<(), HaError> {
        if !self.is_present() {
            return Ok(());
        }

        match *self {
            Field::Name(name) => {
                write_key(sink, keys::NAME, first)?;
                write_quoted(sink, name)
            }
            Field::UniqueId {
                device_id,
                object_id,
            } => {
                if device_id.is_empty() {
                    return Err(HaError::InvalidDevice);
                }
                if object_id.is_empty() {
                    return Err(HaError::MissingObjectId);
                }
                write_key(sink, keys::UNIQUE_ID, first)?;
                sink.put(b"\"")?;
                write_escaped(sink, device_id)?;
                sink.put(b"_")?;
                write_escaped(sink, object_id)?;
                sink.put(b"\"")
            }
            Field::Device(json) => {
                if json.is_empty() {
                    return Err(HaError::InvalidDevice);
                }
                write_key(sink, keys::DEVICE, first)?;
                sink.put(json)
            }
            Field::Availability(path) => {
                write_key(sink, keys::AVAILABILITY_TOPIC, first)?;
                sink.put(b"\"")?;
                path.write_json_to(sink, crate::ha::suffix::AVAILABILITY)?;
                sink.put(b"\"")
            }
            Field::Str { key, value } => {
                write_key(sink, key, first)?;
                write_quoted(sink, value)
            }
            Field::Topic { key, path, suffix } => {
                write_key(sink, key, first)?;
                sink.put(b"\"")?;
                path.write_json_to(sink, suffix)?;
                sink.put(b"\"")
            }
            Field::Number { key, value } => {
                let formatted = format_temperature(value)?;
                write_key(sink, key, first)?;
                sink.put_str(&formatted)
            }
        }
    }
}

/// Writes `{`, the fields and `}`, tracking comma placement
pub struct DocumentWriter<'s, S: JsonSink + ?Sized> {
    sink: &'s mut S,
    first: bool,
}

impl<'s, S: JsonSink + ?Sized> DocumentWriter<'s, S> {
    /// Open the document
    pub fn begin(sink: &'s mut S) -> Result<Self, HaError> {
        sink.put(b"{")?;
        Ok(Self { sink, first: true })
    }

    /// Append a field; absent fields are skipped without affecting commas
    pub fn field(&mut self, field: Field<'_>) -> Result<(), HaError> {
        if !field.is_present() {
            return Ok(());
        }
        field.write(&mut *self.sink, self.first)?;
        self.first = false;
        Ok(())
    }

    /// Close the document
    pub fn end(self) -> Result<(), HaError> {
        self.sink.put(b"}")
    }
}

/// Anything that can be described as a discovery document
pub trait DiscoveryDocument {
    /// Feed every field of the document, in order, to `visit`.
    ///
    /// `device_json` is the serialized device the `dev` field embeds. The
    /// set and order of fields must depend only on the entity's current
    /// configuration.
    fn visit_fields(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError>;
}

/// Exact length of the serialized document, without a terminator
pub fn calculate_serialized_length<D: DiscoveryDocument + ?Sized>(
    document: &D,
    device_json: &[u8],
) -> Result<usize, HaError> {
    let mut counter = LengthCounter::new();
    write_serialized_data(document, device_json, &mut counter)?;
    Ok(counter.len())
}

/// Write the serialized document into `sink`
pub fn write_serialized_data<D: DiscoveryDocument + ?Sized, S: JsonSink + ?Sized>(
    document: &D,
    device_json: &[u8],
    sink: &mut S,
) -> Result<(), HaError> {
    let mut writer = DocumentWriter::begin(sink)?;
    document.visit_fields(device_json, &mut |field| writer.field(field))?;
    writer.end()
}

fn write_key<S: JsonSink + ?Sized>(sink: &mut S, key: &str, first: bool) -> Result<(), HaError> {
    if !first {
        sink.put(b",")?;
    }
    sink.put(b"\"")?;
    sink.put_str(key)?;
    sink.put(b"\":")
}

fn write_quoted<S: JsonSink + ?Sized>(sink: &mut S, value: &str) -> Result<(), HaError> {
    sink.put(b"\"")?;
    write_escaped(sink, value)?;
    sink.put(b"\"")
}

/// Write a JSON string body, escaping quotes, backslashes and control
/// characters.
pub fn write_escaped<S: JsonSink + ?Sized>(sink: &mut S, value: &str) -> Result<(), HaError> {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let bytes = value.as_bytes();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let short: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x00..=0x1f => b"",
            _ => continue,
        };

        sink.put(&bytes[start..i])?;
        if short.is_empty() {
            let unicode = [
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(byte >> 4)],
                HEX[usize::from(byte & 0x0f)],
            ];
            sink.put(&unicode)?;
        } else {
            sink.put(short)?;
        }
        start = i + 1;
    }

    sink.put(&bytes[start..])
}
