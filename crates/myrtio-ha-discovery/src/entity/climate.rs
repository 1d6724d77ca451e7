//! Climate (HVAC) entity
//!
//! The action and the target temperature are always exposed. Auxiliary
//! heating, away mode, hold mode and current temperature reporting are
//! optional features; a disabled feature has no topics, no discovery fields,
//! and its setter fails with [`HaError::FeatureUnsupported`].

use crate::config::Discovery;
use crate::device::Device;
use crate::entity::{Component, EntityBase, HaEntity};
use crate::error::HaError;
use crate::ha::{
    bool_payload, decode_bool, format_temperature, is_valid_temperature, keys, parse_number,
    suffix,
};
use crate::observer::{Observer, Observers};
use crate::router::{CommandRoute, route};
use crate::serializer::{DiscoveryDocument, Field};
use crate::transport::HaTransport;

/// Current operation reported by the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClimateAction {
    #[default]
    Off,
    Heating,
    Cooling,
    Drying,
    Idle,
    Fan,
}

impl ClimateAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ClimateAction::Off => "off",
            ClimateAction::Heating => "heating",
            ClimateAction::Cooling => "cooling",
            ClimateAction::Drying => "drying",
            ClimateAction::Idle => "idle",
            ClimateAction::Fan => "fan",
        }
    }
}

/// Optional climate capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateFeature {
    AuxHeating,
    AwayMode,
    Hold,
    CurrentTemperature,
}

impl ClimateFeature {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of enabled [`ClimateFeature`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClimateFeatures(u8);

impl ClimateFeatures {
    /// No optional features
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every optional feature
    pub const fn all() -> Self {
        Self::empty()
            .with(ClimateFeature::AuxHeating)
            .with(ClimateFeature::AwayMode)
            .with(ClimateFeature::Hold)
            .with(ClimateFeature::CurrentTemperature)
    }

    #[must_use]
    pub const fn with(self, feature: ClimateFeature) -> Self {
        Self(self.0 | feature.bit())
    }

    pub const fn contains(self, feature: ClimateFeature) -> bool {
        self.0 & feature.bit() != 0
    }
}

/// Temperature unit announced to Home Assistant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    /// Use the unit configured in Home Assistant; not announced
    #[default]
    Default,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Wire value, `None` for [`TemperatureUnit::Default`]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            TemperatureUnit::Default => None,
            TemperatureUnit::Celsius => Some("C"),
            TemperatureUnit::Fahrenheit => Some("F"),
        }
    }
}

/// Change reported to climate observers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateEvent {
    AuxHeating(bool),
    AwayMode(bool),
    Hold(bool),
    TargetTemperature(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClimateCommand {
    AuxHeating,
    AwayMode,
    Hold,
    TargetTemperature,
}

impl ClimateCommand {
    const fn feature(self) -> Option<ClimateFeature> {
        match self {
            ClimateCommand::AuxHeating => Some(ClimateFeature::AuxHeating),
            ClimateCommand::AwayMode => Some(ClimateFeature::AwayMode),
            ClimateCommand::Hold => Some(ClimateFeature::Hold),
            ClimateCommand::TargetTemperature => None,
        }
    }
}

const ROUTES: [CommandRoute<ClimateCommand>; 4] = [
    CommandRoute::new(suffix::AUX_COMMAND, ClimateCommand::AuxHeating),
    CommandRoute::new(suffix::AWAY_COMMAND, ClimateCommand::AwayMode),
    CommandRoute::new(suffix::HOLD_COMMAND, ClimateCommand::Hold),
    CommandRoute::new(
        suffix::TARGET_TEMPERATURE_COMMAND,
        ClimateCommand::TargetTemperature,
    ),
];

/// Default step between target temperatures
const DEFAULT_TEMP_STEP: f32 = 1.0;

/// Smallest step that survives two-decimal formatting
const MIN_TEMP_STEP: f32 = 0.01;

/// Last known state of the on/off climate modes
#[derive(Debug, Clone, Copy, Default)]
struct ModeStates {
    aux_heating: bool,
    away: bool,
    hold: bool,
}

/// Climate entity
pub struct Climate<'a> {
    base: EntityBase<'a>,
    features: ClimateFeatures,
    unit: TemperatureUnit,
    min_temp: Option<f32>,
    max_temp: Option<f32>,
    temp_step: f32,
    action: ClimateAction,
    modes: ModeStates,
    current_temperature: Option<f32>,
    target_temperature: Option<f32>,
    observers: Observers<'a, ClimateEvent>,
}

impl<'a> Climate<'a> {
    pub fn new(discovery: &'a Discovery<'a>, object_id: &'a str, features: ClimateFeatures) -> Self {
        Self {
            base: EntityBase::new(discovery, Component::Climate, object_id),
            features,
            unit: TemperatureUnit::Default,
            min_temp: None,
            max_temp: None,
            temp_step: DEFAULT_TEMP_STEP,
            action: ClimateAction::Off,
            modes: ModeStates::default(),
            current_temperature: None,
            target_temperature: None,
            observers: Observers::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.base.set_name(Some(name));
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: &'a str) -> Self {
        self.base.set_icon(Some(icon));
        self
    }

    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, online: bool) -> Self {
        self.base.configure_availability(online);
        self
    }

    pub fn features(&self) -> ClimateFeatures {
        self.features
    }

    pub fn action(&self) -> ClimateAction {
        self.action
    }

    pub fn aux_heating(&self) -> bool {
        self.modes.aux_heating
    }

    pub fn away(&self) -> bool {
        self.modes.away
    }

    pub fn hold(&self) -> bool {
        self.modes.hold
    }

    pub fn current_temperature(&self) -> Option<f32> {
        self.current_temperature
    }

    pub fn target_temperature(&self) -> Option<f32> {
        self.target_temperature
    }

    pub fn min_temp(&self) -> Option<f32> {
        self.min_temp
    }

    pub fn max_temp(&self) -> Option<f32> {
        self.max_temp
    }

    pub fn temp_step(&self) -> f32 {
        self.temp_step
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn set_name(&mut self, name: Option<&'a str>) {
        self.base.set_name(name);
    }

    /// Set the minimum target temperature shown in Home Assistant
    pub fn set_min_temp(&mut self, value: f32) -> Result<(), HaError> {
        if !is_valid_temperature(value) {
            return Err(HaError::InvalidValue);
        }
        self.min_temp = Some(value);
        Ok(())
    }

    /// Set the maximum target temperature shown in Home Assistant
    pub fn set_max_temp(&mut self, value: f32) -> Result<(), HaError> {
        if !is_valid_temperature(value) {
            return Err(HaError::InvalidValue);
        }
        self.max_temp = Some(value);
        Ok(())
    }

    /// Set the target temperature step, which must lie in [0.01, 255)
    pub fn set_temp_step(&mut self, value: f32) -> Result<(), HaError> {
        if !value.is_finite() || value < MIN_TEMP_STEP || value >= 255.0 {
            return Err(HaError::InvalidValue);
        }
        self.temp_step = value;
        Ok(())
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    pub fn observe(&mut self, observer: &'a dyn Observer<ClimateEvent>) -> Result<(), HaError> {
        self.observers.add(observer)
    }

    pub fn set_action(
        &mut self,
        transport: &mut dyn HaTransport,
        action: ClimateAction,
    ) -> Result<(), HaError> {
        if action == self.action {
            return Ok(());
        }

        self.base
            .publish_str(transport, suffix::ACTION, action.as_str())?;
        self.action = action;
        Ok(())
    }

    pub fn set_aux_heating(
        &mut self,
        transport: &mut dyn HaTransport,
        state: bool,
    ) -> Result<(), HaError> {
        self.require(ClimateFeature::AuxHeating)?;
        if state == self.modes.aux_heating {
            return Ok(());
        }

        self.base
            .publish_str(transport, suffix::AUX_STATE, bool_payload(state))?;
        self.modes.aux_heating = state;
        self.observers.notify(&ClimateEvent::AuxHeating(state));
        Ok(())
    }

    pub fn set_away(&mut self, transport: &mut dyn HaTransport, state: bool) -> Result<(), HaError> {
        self.require(ClimateFeature::AwayMode)?;
        if state == self.modes.away {
            return Ok(());
        }

        self.base
            .publish_str(transport, suffix::AWAY_STATE, bool_payload(state))?;
        self.modes.away = state;
        self.observers.notify(&ClimateEvent::AwayMode(state));
        Ok(())
    }

    pub fn set_hold(&mut self, transport: &mut dyn HaTransport, state: bool) -> Result<(), HaError> {
        self.require(ClimateFeature::Hold)?;
        if state == self.modes.hold {
            return Ok(());
        }

        self.base
            .publish_str(transport, suffix::HOLD_STATE, bool_payload(state))?;
        self.modes.hold = state;
        self.observers.notify(&ClimateEvent::Hold(state));
        Ok(())
    }

    /// Report the measured temperature
    pub fn set_current_temperature(
        &mut self,
        transport: &mut dyn HaTransport,
        temperature: f32,
    ) -> Result<(), HaError> {
        self.require(ClimateFeature::CurrentTemperature)?;
        if !is_valid_temperature(temperature) {
            return Err(HaError::InvalidValue);
        }
        if self.current_temperature == Some(temperature) {
            return Ok(());
        }

        let payload = format_temperature(temperature)?;
        self.base
            .publish_str(transport, suffix::CURRENT_TEMPERATURE, &payload)?;
        self.current_temperature = Some(temperature);
        Ok(())
    }

    pub fn set_target_temperature(
        &mut self,
        transport: &mut dyn HaTransport,
        temperature: f32,
    ) -> Result<(), HaError> {
        if !is_valid_temperature(temperature) {
            return Err(HaError::InvalidValue);
        }
        if self.target_temperature == Some(temperature) {
            return Ok(());
        }

        let payload = format_temperature(temperature)?;
        self.base
            .publish_str(transport, suffix::TARGET_TEMPERATURE_STATE, &payload)?;
        self.target_temperature = Some(temperature);
        self.observers
            .notify(&ClimateEvent::TargetTemperature(temperature));
        Ok(())
    }

    pub fn set_availability(
        &mut self,
        transport: &mut dyn HaTransport,
        online: bool,
    ) -> Result<(), HaError> {
        self.base.set_availability(transport, online)
    }

    fn require(&self, feature: ClimateFeature) -> Result<(), HaError> {
        if self.features.contains(feature) {
            Ok(())
        } else {
            Err(HaError::FeatureUnsupported)
        }
    }

    fn accepts(&self, command: ClimateCommand) -> bool {
        command
            .feature()
            .is_none_or(|feature| self.features.contains(feature))
    }

    /// Republish every state the hub should know about
    fn publish_states(&self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        let base = &self.base;

        base.publish_str(transport, suffix::ACTION, self.action.as_str())?;
        if self.features.contains(ClimateFeature::AuxHeating) {
            let payload = bool_payload(self.modes.aux_heating);
            base.publish_str(transport, suffix::AUX_STATE, payload)?;
        }
        if self.features.contains(ClimateFeature::AwayMode) {
            base.publish_str(transport, suffix::AWAY_STATE, bool_payload(self.modes.away))?;
        }
        if self.features.contains(ClimateFeature::Hold) {
            base.publish_str(transport, suffix::HOLD_STATE, bool_payload(self.modes.hold))?;
        }
        if self.features.contains(ClimateFeature::CurrentTemperature)
            && let Some(temperature) = self.current_temperature
        {
            let payload = format_temperature(temperature)?;
            base.publish_str(transport, suffix::CURRENT_TEMPERATURE, &payload)?;
        }
        if let Some(temperature) = self.target_temperature {
            let payload = format_temperature(temperature)?;
            base.publish_str(transport, suffix::TARGET_TEMPERATURE_STATE, &payload)?;
        }
        Ok(())
    }

    fn subscribe_commands(&self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        for route in &ROUTES {
            if self.accepts(route.command) {
                self.base.subscribe(transport, route.suffix)?;
            }
        }
        Ok(())
    }
}

impl DiscoveryDocument for Climate<'_> {
    fn visit_fields(
        &self,
        device_json: &[u8],
        visit: &mut dyn FnMut(Field<'_>) -> Result<(), HaError>,
    ) -> Result<(), HaError> {
        let path = self.base.path();
        let topic = |key, suffix| Field::Topic { key, path, suffix };

        self.base.visit_head(visit)?;
        visit(topic(keys::ACTION_TOPIC, suffix::ACTION))?;

        if self.features.contains(ClimateFeature::AuxHeating) {
            visit(topic(keys::AUX_COMMAND_TOPIC, suffix::AUX_COMMAND))?;
            visit(topic(keys::AUX_STATE_TOPIC, suffix::AUX_STATE))?;
        }
        if self.features.contains(ClimateFeature::AwayMode) {
            visit(topic(keys::AWAY_MODE_COMMAND_TOPIC, suffix::AWAY_COMMAND))?;
            visit(topic(keys::AWAY_MODE_STATE_TOPIC, suffix::AWAY_STATE))?;
        }
        if self.features.contains(ClimateFeature::Hold) {
            visit(topic(keys::HOLD_COMMAND_TOPIC, suffix::HOLD_COMMAND))?;
            visit(topic(keys::HOLD_STATE_TOPIC, suffix::HOLD_STATE))?;
        }
        if self.features.contains(ClimateFeature::CurrentTemperature) {
            visit(topic(
                keys::CURRENT_TEMPERATURE_TOPIC,
                suffix::CURRENT_TEMPERATURE,
            ))?;
        }

        if let Some(value) = self.min_temp {
            visit(Field::Number {
                key: keys::MIN_TEMP,
                value,
            })?;
        }
        if let Some(value) = self.max_temp {
            visit(Field::Number {
                key: keys::MAX_TEMP,
                value,
            })?;
        }
        visit(Field::Number {
            key: keys::TEMP_STEP,
            value: self.temp_step,
        })?;

        visit(topic(
            keys::TEMPERATURE_COMMAND_TOPIC,
            suffix::TARGET_TEMPERATURE_COMMAND,
        ))?;
        visit(topic(
            keys::TEMPERATURE_STATE_TOPIC,
            suffix::TARGET_TEMPERATURE_STATE,
        ))?;

        if let Some(unit) = self.unit.as_str() {
            visit(Field::Str {
                key: keys::TEMP_UNIT,
                value: unit,
            })?;
        }

        self.base.visit_tail(device_json, visit)
    }
}

impl HaEntity for Climate<'_> {
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
        self.publish_states(transport)?;
        self.base.publish_availability(transport)?;
        self.subscribe_commands(transport)
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

        let Some(command) =
            route(topic, &self.base.path(), &ROUTES).filter(|command| self.accepts(*command))
        else {
            return Ok(false);
        };

        match command {
            ClimateCommand::AuxHeating => self.set_aux_heating(transport, decode_bool(payload))?,
            ClimateCommand::AwayMode => self.set_away(transport, decode_bool(payload))?,
            ClimateCommand::Hold => self.set_hold(transport, decode_bool(payload))?,
            ClimateCommand::TargetTemperature => {
                let temperature = parse_number(payload).ok_or(HaError::InvalidValue)?;
                self.set_target_temperature(transport, temperature)?;
            }
        }
        Ok(true)
    }
}
