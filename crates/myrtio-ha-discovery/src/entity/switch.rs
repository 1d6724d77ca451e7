//! Switch entity
//!
//! Two-state entity commanded by Home Assistant. The state is published to
//! `stat_t`, commands arrive on `cmd_t` as `ON` or `OFF`.

use crate::config::Discovery;
use crate::device::Device;
use crate::entity::{Component, EntityBase, HaEntity};
use crate::error::HaError;
use crate::ha::{bool_payload, decode_bool, keys, suffix};
use crate::observer::{Observer, Observers};
use crate::router::{CommandRoute, route};
use crate::serializer::{DiscoveryDocument, Field};
use crate::transport::HaTransport;

/// Commands a switch accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchCommand {
    State,
}

const ROUTES: [CommandRoute<SwitchCommand>; 1] =
    [CommandRoute::new(suffix::COMMAND, SwitchCommand::State)];

/// Switch entity
///
/// ```ignore
/// static DEVICE: Device = Device::new("myrtio_relay", "Relay board");
/// static DISCOVERY: Discovery = Discovery::new(&DEVICE);
///
/// let mut relay = Switch::new(&DISCOVERY, "relay1").with_name("Relay 1");
/// relay.observe(&|state: &bool| set_pin(*state))?;
/// relay.on_connected(&mut client)?;
/// ```
pub struct Switch<'a> {
    base: EntityBase<'a>,
    state: bool,
    observers: Observers<'a, bool>,
}

impl<'a> Switch<'a> {
    /// Create a switch that starts in the `OFF` state
    pub fn new(discovery: &'a Discovery<'a>, object_id: &'a str) -> Self {
        Self {
            base: EntityBase::new(discovery, Component::Switch, object_id),
            state: false,
            observers: Observers::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.base.set_name(Some(name));
        self
    }

    /// Set the device class (e.g. `outlet`)
    #[must_use]
    pub fn with_device_class(mut self, device_class: &'a str) -> Self {
        self.base.set_device_class(Some(device_class));
        self
    }

    /// Set the MDI icon (e.g. `mdi:power-socket-eu`)
    #[must_use]
    pub fn with_icon(mut self, icon: &'a str) -> Self {
        self.base.set_icon(Some(icon));
        self
    }

    /// Set the state announced on the first connection
    #[must_use]
    pub fn with_initial_state(mut self, state: bool) -> Self {
        self.state = state;
        self
    }

    /// Publish availability on `avty_t`, starting with `online`
    #[must_use]
    pub fn with_availability(mut self, online: bool) -> Self {
        self.base.configure_availability(online);
        self
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn name(&self) -> Option<&'a str> {
        self.base.name()
    }

    /// Change the display name; takes effect on the next announcement
    pub fn set_name(&mut self, name: Option<&'a str>) {
        self.base.set_name(name);
    }

    /// Register an observer notified after every state change
    pub fn observe(&mut self, observer: &'a dyn Observer<bool>) -> Result<(), HaError> {
        self.observers.add(observer)
    }

    /// Change the state.
    ///
    /// The new state is published first; local state changes and observers
    /// are notified only when the publish succeeded.
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

    pub fn turn_on(&mut self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        self.set_state(transport, true)
    }

    pub fn turn_off(&mut self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        self.set_state(transport, false)
    }

    /// Publish `online` or `offline` on the availability topic
    pub fn set_availability(
        &mut self,
        transport: &mut dyn HaTransport,
        online: bool,
    ) -> Result<(), HaError> {
        self.base.set_availability(transport, online)
    }
}

impl DiscoveryDocument for Switch<'_> {
    fn visit_fields(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        let path = self.base.path();

        self.base.visit_head(visit)?;
        visit(Field::Topic {
            key: keys::COMMAND_TOPIC,
            path,
            suffix: suffix::COMMAND,
        })?;
        visit(Field::Topic {
            key: keys::STATE_TOPIC,
            path,
            suffix: suffix::STATE,
        })?;
        self.base.visit_tail(device_json, visit)
    }
}

impl HaEntity for Switch<'_> {
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
        self.base.publish_availability(transport)?;
        self.base.subscribe(transport, suffix::COMMAND)
    }

    fn on_message(
        &mut self,
        transport: &mut dyn HaTransport,
        topic: &str,
        payload: &[u8],
    ) -> Result<bool, HaError> {
        if self.base.ensure_identity().is_err() {
            return Ok(false);
        }

        let Some(SwitchCommand::State) = route(topic, &self.base.path(), &ROUTES) else {
            return Ok(false);
        };
        self.set_state(transport, decode_bool(payload))?;
        Ok(true)
    }
}
