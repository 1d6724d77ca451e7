//! Home Assistant MQTT discovery for embedded devices
//!
//! This crate announces a device and its entities to Home Assistant over an
//! MQTT-like transport and keeps local and hub-visible state in lock-step.
//! It is structured in four layers:
//!
//! - **Topics** (`topic`): `{prefix}/{component}/{object_id}/{suffix}` sizing and building
//! - **Encoder** (`serializer`): two-pass discovery documents, sized exactly before streaming
//! - **Entities** (`entity`): binary sensor, switch and climate state machines
//! - **Routing** (`router`): exact command topic matching and fan-out over many entities
//!
//! The transport is a collaborator behind the object-safe [`HaTransport`]
//! trait and is borrowed for every call. Nothing allocates.
//!
//! # Example
//!
//! ```ignore
//! use myrtio_ha_discovery::{Device, Discovery, HaEntity, Switch};
//!
//! static DEVICE: Device = Device::new("myrtio_relay", "Relay board");
//! static DISCOVERY: Discovery = Discovery::new(&DEVICE);
//!
//! let mut relay = Switch::new(&DISCOVERY, "relay1").with_name("Relay 1");
//!
//! // After every (re)connection
//! relay.on_connected(&mut client)?;
//!
//! // For every inbound message
//! relay.on_message(&mut client, topic, payload)?;
//! ```

#![no_std]

pub mod config;
pub mod device;
pub mod entity;
pub mod error;
pub mod ha;
pub mod observer;
pub mod router;
pub mod serializer;
pub mod topic;
pub mod transport;

// Re-export domain types
pub use config::{DEFAULT_DISCOVERY_PREFIX, Discovery};
pub use device::{Device, DeviceJson};
pub use entity::{
    BinarySensor, Climate, ClimateAction, ClimateEvent, ClimateFeature, ClimateFeatures,
    Component, EntityBase, HaEntity, Switch, TemperatureUnit,
};
pub use error::{HaError, TransportError};
pub use observer::{Observer, Observers};

// Re-export the encoding and routing layers
pub use router::{
    CommandRoute, EntityRegistry, announce_all, command_matches, dispatch_message, route,
};
pub use serializer::{
    DiscoveryDocument, Field, JsonSink, LengthCounter, SliceWriter, TransportWriter,
};
pub use topic::{Topic, TopicPath, calculate_topic_length, generate_topic, is_valid_object_id};
pub use transport::HaTransport;
