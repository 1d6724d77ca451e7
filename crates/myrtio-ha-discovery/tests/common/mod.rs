//! Recording transport shared by the integration tests.

#![allow(dead_code, unreachable_pub)]

use myrtio_ha_discovery::{HaTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Publish {
        topic: String,
        payload: String,
        retain: bool,
    },
    Subscribe(String),
}

struct OpenMessage {
    topic: String,
    length: u16,
    retain: bool,
    data: Vec<u8>,
}

/// Transport that records every publish and subscribe in order
pub struct RecordingTransport {
    pub events: Vec<Event>,
    pub connected: bool,
    pub fail_publish: bool,
    pub fail_write: bool,
    pub fail_subscribe: bool,
    /// Streamed messages that were closed after a write failure
    pub aborted: usize,
    open: Option<OpenMessage>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            connected: true,
            fail_publish: false,
            fail_write: false,
            fail_subscribe: false,
            aborted: 0,
            open: None,
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// `(topic, payload)` of every publish, in order
    pub fn publishes(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Publish { topic, payload, .. } => Some((topic.as_str(), payload.as_str())),
                Event::Subscribe(_) => None,
            })
            .collect()
    }

    /// Every subscribed topic, in order
    pub fn subscriptions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Subscribe(topic) => Some(topic.as_str()),
                Event::Publish { .. } => None,
            })
            .collect()
    }

    /// Topic of every event, in order, subscriptions prefixed with `sub:`
    pub fn timeline(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| match event {
                Event::Publish { topic, .. } => topic.clone(),
                Event::Subscribe(topic) => format!("sub:{topic}"),
            })
            .collect()
    }

    /// Payload of the last publish to `topic`
    pub fn last_payload(&self, topic: &str) -> Option<&str> {
        self.publishes()
            .into_iter()
            .rev()
            .find(|(t, _)| *t == topic)
            .map(|(_, payload)| payload)
    }

    /// Parsed discovery document last published to `topic`
    pub fn document(&self, topic: &str) -> serde_json::Value {
        let payload = self
            .last_payload(topic)
            .unwrap_or_else(|| panic!("nothing published to {topic}"));
        serde_json::from_str(payload).expect("discovery document is valid JSON")
    }

    fn check(&self) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        Ok(())
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HaTransport for RecordingTransport {
    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), TransportError> {
        self.check()?;
        if self.fail_publish {
            return Err(TransportError::Rejected);
        }

        self.events.push(Event::Publish {
            topic: topic.to_owned(),
            payload: String::from_utf8(payload.to_vec()).expect("payload is UTF-8"),
            retain,
        });
        Ok(())
    }

    fn begin_publish(
        &mut self,
        topic: &str,
        length: u16,
        retain: bool,
    ) -> Result<(), TransportError> {
        self.check()?;
        if self.fail_publish {
            return Err(TransportError::Rejected);
        }
        assert!(self.open.is_none(), "begin_publish while a message is open");

        self.open = Some(OpenMessage {
            topic: topic.to_owned(),
            length,
            retain,
            data: Vec::new(),
        });
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_write {
            return Err(TransportError::WriteFailed);
        }
        let open = self.open.as_mut().ok_or(TransportError::WriteFailed)?;
        open.data.extend_from_slice(bytes);
        Ok(())
    }

    fn end_publish(&mut self) -> Result<(), TransportError> {
        let open = self.open.take().ok_or(TransportError::Rejected)?;

        if self.fail_write {
            self.aborted += 1;
            return Ok(());
        }

        assert_eq!(
            open.data.len(),
            usize::from(open.length),
            "streamed length differs from the announced length"
        );
        self.events.push(Event::Publish {
            topic: open.topic,
            payload: String::from_utf8(open.data).expect("payload is UTF-8"),
            retain: open.retain,
        });
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.check()?;
        if self.fail_subscribe {
            return Err(TransportError::Rejected);
        }

        self.events.push(Event::Subscribe(topic.to_owned()));
        Ok(())
    }
}
