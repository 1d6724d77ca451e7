//! Topic generation utilities for Home Assistant MQTT integration
//!
//! Every entity topic has the fixed shape
//! `{prefix}/{component}/{object_id}/{suffix}`: four segments, three
//! separating slashes. Topics go on the wire raw and are escaped only when
//! embedded in a JSON document.

use heapless::String;

use crate::config::MAX_TOPIC_LEN;
use crate::error::HaError;
use crate::serializer::{JsonSink, SliceWriter, write_escaped};

/// Owned topic string
pub type Topic = String<MAX_TOPIC_LEN>;

/// Number of separators between the four topic segments
const SEPARATORS: usize = 3;

/// The three fixed segments of an entity topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicPath<'a> {
    pub prefix: &'a str,
    pub component: &'a str,
    pub object_id: &'a str,
}

impl<'a> TopicPath<'a> {
    pub const fn new(prefix: &'a str, component: &'a str, object_id: &'a str) -> Self {
        Self {
            prefix,
            component,
            object_id,
        }
    }

    /// Length of the topic for `suffix`, zero when any segment is empty
    pub fn len(&self, suffix: &str, include_terminator: bool) -> usize {
        calculate_topic_length(
            self.prefix,
            self.component,
            self.object_id,
            suffix,
            include_terminator,
        )
    }

    /// Stream the topic for `suffix` into a sink
    pub fn write_to<S: JsonSink + ?Sized>(&self, sink: &mut S, suffix: &str) -> Result<(), HaError> {
        if self.len(suffix, false) == 0 {
            return Err(HaError::MissingObjectId);
        }

        sink.put_str(self.prefix)?;
        sink.put(b"/")?;
        sink.put_str(self.component)?;
        sink.put(b"/")?;
        sink.put_str(self.object_id)?;
        sink.put(b"/")?;
        sink.put_str(suffix)
    }

    /// Stream the topic for `suffix` as the body of a JSON string
    pub fn write_json_to<S: JsonSink + ?Sized>(
        &self,
        sink: &mut S,
        suffix: &str,
    ) -> Result<(), HaError> {
        if self.len(suffix, false) == 0 {
            return Err(HaError::MissingObjectId);
        }

        write_escaped(sink, self.prefix)?;
        sink.put(b"/")?;
        write_escaped(sink, self.component)?;
        sink.put(b"/")?;
        write_escaped(sink, self.object_id)?;
        sink.put(b"/")?;
        write_escaped(sink, suffix)
    }

    /// Build an owned topic for `suffix`
    pub fn build(&self, suffix: &str) -> Result<Topic, HaError> {
        if self.len(suffix, false) == 0 {
            return Err(HaError::MissingObjectId);
        }

        let mut topic = Topic::new();
        for part in [self.prefix, "/", self.component, "/", self.object_id, "/", suffix] {
            topic.push_str(part).map_err(|()| HaError::TopicTooLong)?;
        }
        Ok(topic)
    }

    /// Check whether `topic` is exactly the topic for `suffix`.
    ///
    /// The comparison walks the segments in place, so an object id that is
    /// a prefix or suffix of another (`kitchen` and `kitchen2`) never
    /// matches the other's topic.
    pub fn matches(&self, topic: &str, suffix: &str) -> bool {
        if self.len(suffix, false) == 0 {
            return false;
        }

        topic
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(self.component))
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(self.object_id))
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| rest == suffix)
    }
}

/// Whether `object_id` can stand as a single topic level.
///
/// Rejects empty ids, topic separators and wildcards (`/`, `+`, `#`), and
/// characters that would need escaping inside a JSON string.
pub fn is_valid_object_id(object_id: &str) -> bool {
    !object_id.is_empty()
        && !object_id
            .chars()
            .any(|ch| matches!(ch, '/' | '+' | '#' | '"' | '\\') || ch.is_control())
}

/// Calculate the length of `{prefix}/{component}/{object_id}/{suffix}`.
///
/// Returns zero when any segment is empty; callers must treat zero as
/// "cannot build this topic" and abort.
pub fn calculate_topic_length(
    prefix: &str,
    component: &str,
    object_id: &str,
    suffix: &str,
    include_terminator: bool,
) -> usize {
    let segments = [prefix, component, object_id, suffix];
    if segments.iter().any(|s| s.is_empty()) {
        return 0;
    }

    let content: usize = segments.iter().map(|s| s.len()).sum::<usize>() + SEPARATORS;
    content + usize::from(include_terminator)
}

/// Write a null-terminated topic into `output`.
///
/// `output` must be exactly as long as [`calculate_topic_length`] with
/// `include_terminator = true` reports for the same segments. Returns the
/// topic length without the terminator, or zero if a segment is empty or the
/// buffer does not have the calculated size.
pub fn generate_topic(
    output: &mut [u8],
    prefix: &str,
    component: &str,
    object_id: &str,
    suffix: &str,
) -> usize {
    let expected = calculate_topic_length(prefix, component, object_id, suffix, true);
    if expected == 0 {
        return 0;
    }
    debug_assert_eq!(output.len(), expected, "topic buffer must be sized by calculate_topic_length");
    if output.len() != expected {
        return 0;
    }

    let path = TopicPath::new(prefix, component, object_id);
    let mut writer = SliceWriter::new(output);
    if path.write_to(&mut writer, suffix).is_err() || writer.put(&[0]).is_err() {
        return 0;
    }

    expected - 1
}
