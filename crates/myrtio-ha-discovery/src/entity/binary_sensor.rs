//! Binary sensor entity
//!
//! Read-only two-state entity. It publishes `ON`/`OFF` to `stat_t` and never
//! subscribes to anything.

use crate::config::Discovery;
use crate::device::Device;
use crate::entity::{Component, EntityBase, HaEntity};
use crate::error::HaError;
use crate::ha::{bool_payload, keys, suffix};
use crate::observer::{Observer, Observers};
use crate::serializer::{DiscoveryDocument, Field};
use crate::transport::HaTransport;

/// Binary sensor entity
pub struct BinarySensor<'a> {
    base: EntityBase<'a>,
    state: bool,
    observers: Observers<'a, bool>,
}

impl<'a> BinarySensor<'a> {
    pub fn new(discovery: &'a Discovery<'a>, object_id: &'a str) -> Self {
        Self {
            base: EntityBase::new(discovery, Component::BinarySensor, object_id),
            state: false,
            observers: Observers::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.base.set_name(Some(name));
        self
    }

    /// Set the device class (e.g. `motion`, `door`)
    #[must_use]
    pub fn with_device_class(mut self, device_class: &'a str) -> Self {
        self.base.set_device_class(Some(device_class));
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: &'a str) -> Self {
        self.base.set_icon(Some(icon));
        self
    }

    #[must_use]
    pub fn with_initial_state(mut self, state: bool) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, online: bool) -> Self {
        self.base.configure_availability(online);
        self
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn set_name(&mut self, name: Option<&'a str>) {
        self.base.set_name(name);
    }

    pub fn observe(&mut self, observer: &'a dyn Observer<bool>) -> Result<(), HaError> {
        self.observers.add(observer)
    }

    /// Report a new sensor reading; unchanged readings are not republished
    pub fn set_state(&mut self, transport: &mut dyn HaTransport, state: bool) -> Result<(), HaError> {
        if state == self.state {
            return Ok(());
        }

        self.base
            .publish_str(transport, suffix::STATE, bool_payload(state))?;
        self.state = state;
        self.observers.notify(&state);
        Ok(())
    }

    pub fn set_availability(
        &mut self,
        transport: &mut dyn HaTransport,
        online: bool,
    ) -> Result<(), HaError> {
        self.base.set_availability(transport, online)
    }
}

impl DiscoveryDocument for BinarySensor<'_> {
    fn visit_fields(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        self.base.visit_head(visit)?;
        visit(Field::Topic {
            key: keys::STATE_TOPIC,
            path: self.base.path(),
            suffix: suffix::STATE,
        })?;
        self.base.visit_tail(device_json, visit)
    }
}

impl HaEntity for BinarySensor<'_> {
    fn component(&self) -> Component {
        self.base.component()
    }

    fn object_id(&self) -> &str {
        self.base.object_id()
    }

    fn device(&self) -> &Device<'_> {
        self.base.device()
    }

    fn on_connected(&mut self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        self.base.ensure_identity()?;

        self.base.publish_config(transport, &*self)?;
        self.base
            .publish_str(transport, suffix::STATE, bool_payload(self.state))?;
        self.base.publish_availability(transport)
    }

    fn on_message(
        &mut self,
        _transport: &mut dyn HaTransport,
        _topic: &str,
        _payload: &[u8],
    ) -> Result<bool, HaError> {
        Ok(false)
    }
}
