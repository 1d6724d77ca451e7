//! Entity state machines
//!
//! Every entity kind follows the same lifecycle:
//!
//! - `on_connected` publishes the discovery document, then every state the
//!   entity exposes, then its availability, and subscribes to its command
//!   topics last, so no command is processed before the entity is announced.
//! - `set_*` transitions publish first and update local state only when the
//!   publish succeeded. Setting the current value again is a no-op.
//! - `on_message` matches the topic against the entity's command topics and
//!   runs the matching transition.

pub mod binary_sensor;
pub mod climate;
pub mod switch;

pub use binary_sensor::BinarySensor;
pub use climate::{
    Climate, ClimateAction, ClimateEvent, ClimateFeature, ClimateFeatures, TemperatureUnit,
};
pub use switch::Switch;

use log::{debug, warn};

use crate::config::Discovery;
use crate::device::Device;
use crate::error::HaError;
use crate::ha::{availability_payload, keys, suffix};
use crate::serializer::{
    self, DiscoveryDocument, Field, JsonSink, TransportWriter, write_serialized_data,
};
use crate::topic::{Topic, TopicPath, is_valid_object_id};
use crate::transport::HaTransport;

/// Home Assistant component an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    BinarySensor,
    Switch,
    Climate,
}

impl Component {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Component::BinarySensor => "binary_sensor",
            Component::Switch => "switch",
            Component::Climate => "climate",
        }
    }
}

/// Object-safe interface shared by all entity kinds
pub trait HaEntity: DiscoveryDocument {
    /// Component kind of the entity
    fn component(&self) -> Component;

    /// Object id, the per-entity topic segment
    fn object_id(&self) -> &str;

    /// Device the entity belongs to
    fn device(&self) -> &Device<'_>;

    /// Announce the entity after the transport (re)connected
    fn on_connected(&mut self, transport: &mut dyn HaTransport) -> Result<(), HaError>;

    /// Handle an inbound message.
    ///
    /// Returns `Ok(true)` when the topic was one of the entity's command
    /// topics, `Ok(false)` when it was not.
    fn on_message(
        &mut self,
        transport: &mut dyn HaTransport,
        topic: &str,
        payload: &[u8],
    ) -> Result<bool, HaError>;

    /// Exact length of the discovery document
    fn calculate_serialized_length(&self) -> Result<usize, HaError> {
        let device_json = self.device().to_json()?;
        serializer::calculate_serialized_length(self, &device_json)
    }

    /// Write the discovery document into `sink`
    fn write_serialized_data(&self, sink: &mut dyn JsonSink) -> Result<(), HaError> {
        let device_json = self.device().to_json()?;
        write_serialized_data(self, &device_json, sink)
    }
}

/// Identity, metadata and publishing helpers shared by every entity kind
#[derive(Debug, Clone)]
pub struct EntityBase<'a> {
    discovery: &'a Discovery<'a>,
    component: Component,
    object_id: &'a str,
    name: Option<&'a str>,
    device_class: Option<&'a str>,
    icon: Option<&'a str>,
    availability: Option<bool>,
}

impl<'a> EntityBase<'a> {
    pub const fn new(discovery: &'a Discovery<'a>, component: Component, object_id: &'a str) -> Self {
        Self {
            discovery,
            component,
            object_id,
            name: None,
            device_class: None,
            icon: None,
            availability: None,
        }
    }

    pub const fn component(&self) -> Component {
        self.component
    }

    pub const fn object_id(&self) -> &'a str {
        self.object_id
    }

    pub const fn device(&self) -> &'a Device<'a> {
        self.discovery.device
    }

    pub const fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn set_name(&mut self, name: Option<&'a str>) {
        self.name = name;
    }

    pub fn set_device_class(&mut self, device_class: Option<&'a str>) {
        self.device_class = device_class;
    }

    pub fn set_icon(&mut self, icon: Option<&'a str>) {
        self.icon = icon;
    }

    /// Configure a per-entity availability topic with its initial state
    pub fn configure_availability(&mut self, online: bool) {
        self.availability = Some(online);
    }

    /// Current availability, `None` when not configured
    pub const fn availability(&self) -> Option<bool> {
        self.availability
    }

    /// Topic path of this entity
    pub const fn path(&self) -> TopicPath<'a> {
        TopicPath::new(self.discovery.prefix, self.component.as_str(), self.object_id)
    }

    /// Fail unless the entity and its device are addressable
    pub fn ensure_identity(&self) -> Result<(), HaError> {
        if self.object_id.is_empty() {
            return Err(HaError::MissingObjectId);
        }
        if !is_valid_object_id(self.object_id) {
            return Err(HaError::InvalidObjectId);
        }
        if self.discovery.device.id.is_empty() {
            return Err(HaError::InvalidDevice);
        }
        Ok(())
    }

    /// Build the topic for `suffix`
    pub fn topic(&self, suffix: &str) -> Result<Topic, HaError> {
        self.path().build(suffix)
    }

    /// Check whether `topic` is this entity's topic for `suffix`
    pub fn is_topic(&self, topic: &str, suffix: &str) -> bool {
        self.path().matches(topic, suffix)
    }

    /// `name` and `uniq_id`, the fields every document starts with
    pub fn visit_head(
        &self,
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        visit(Field::Name(self.name.unwrap_or("")))?;
        visit(Field::UniqueId {
            device_id: self.discovery.device.id,
            object_id: self.object_id,
        })
    }

    /// Device class, icon, availability and device, the fields every
    /// document ends with
    pub fn visit_tail(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        if let Some(device_class) = self.device_class {
            visit(Field::Str {
                key: keys::DEVICE_CLASS,
                value: device_class,
            })?;
        }
        if let Some(icon) = self.icon {
            visit(Field::Str {
                key: keys::ICON,
                value: icon,
            })?;
        }
        if self.availability.is_some() {
            visit(Field::Availability(self.path()))?;
        }
        visit(Field::Device(device_json))
    }

    /// Publish the discovery document of `document` to the config topic.
    ///
    /// The document is sized first, then streamed into a message of exactly
    /// that size. Nothing is written when the message cannot be opened.
    pub fn publish_config(
        &self,
        transport: &mut dyn HaTransport,
        document: &dyn DiscoveryDocument,
    ) -> Result<(), HaError> {
        self.ensure_identity()?;

        let device_json = self.discovery.device.to_json()?;
        let topic = self.topic(suffix::CONFIG)?;
        let length = serializer::calculate_serialized_length(document, &device_json)?;
        let length = u16::try_from(length).map_err(|_| HaError::PayloadTooLarge)?;

        if let Err(e) = transport.begin_publish(&topic, length, true) {
            warn!("ha: cannot open config message on {}: {}", topic, e);
            return Err(e.into());
        }

        let mut writer = TransportWriter::new(transport);
        let written = write_serialized_data(document, &device_json, &mut writer);
        let count = writer.written();
        let ended = transport.end_publish();

        written?;
        ended?;
        debug_assert_eq!(count, usize::from(length));
        debug!("ha: published config {} ({} bytes)", topic, length);
        Ok(())
    }

    /// Publish a retained state payload to the topic for `suffix`
    pub fn publish_str(
        &self,
        transport: &mut dyn HaTransport,
        suffix: &str,
        payload: &str,
    ) -> Result<(), HaError> {
        self.ensure_identity()?;
        let topic = self.topic(suffix)?;

        if let Err(e) = transport.publish(&topic, payload.as_bytes(), true) {
            warn!("ha: publish to {} failed: {}", topic, e);
            return Err(e.into());
        }
        debug!("ha: {} <- {}", topic, payload);
        Ok(())
    }

    /// Subscribe to the topic for `suffix`
    pub fn subscribe(&self, transport: &mut dyn HaTransport, suffix: &str) -> Result<(), HaError> {
        self.ensure_identity()?;
        let topic = self.topic(suffix)?;

        transport.subscribe(&topic).map_err(|e| {
            warn!("ha: subscribe to {} failed: {}", topic, e);
            HaError::from(e)
        })?;
        debug!("ha: subscribed {}", topic);
        Ok(())
    }

    /// Republish the configured availability, if any
    pub fn publish_availability(&self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        match self.availability {
            Some(online) => {
                self.publish_str(transport, suffix::AVAILABILITY, availability_payload(online))
            }
            None => Ok(()),
        }
    }

    /// Change availability, publishing it first.
    ///
    /// The first call configures the availability topic; it becomes part of
    /// the discovery document from the next announcement on.
    pub fn set_availability(
        &mut self,
        transport: &mut dyn HaTransport,
        online: bool,
    ) -> Result<(), HaError> {
        if self.availability == Some(online) {
            return Ok(());
        }

        self.publish_str(transport, suffix::AVAILABILITY, availability_payload(online))?;
        self.availability = Some(online);
        Ok(())
    }
}
