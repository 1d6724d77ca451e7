//! Command routing
//!
//! Inbound messages are matched against the command topics of an entity by
//! exact comparison of the whole topic. A table of [`CommandRoute`]s maps
//! each command suffix to the command it triggers.
//!
//! [`EntityRegistry`] fans connection events and inbound messages out to
//! every registered entity, in registration order.

use heapless::Vec;
use log::{debug, warn};

use crate::entity::HaEntity;
use crate::error::HaError;
use crate::topic::TopicPath;
use crate::transport::HaTransport;

/// One command topic of an entity and the command it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRoute<C> {
    pub suffix: &'static str,
    pub command: C,
}

impl<C> CommandRoute<C> {
    pub const fn new(suffix: &'static str, command: C) -> Self {
        Self { suffix, command }
    }
}

/// Check whether `topic` is exactly the command topic `suffix` of `path`
pub fn command_matches(topic: &str, path: &TopicPath<'_>, suffix: &str) -> bool {
    path.matches(topic, suffix)
}

/// Find the command whose topic equals `topic`
pub fn route<C: Copy>(topic: &str, path: &TopicPath<'_>, routes: &[CommandRoute<C>]) -> Option<C> {
    routes
        .iter()
        .find(|route| command_matches(topic, path, route.suffix))
        .map(|route| route.command)
}

/// Announce every entity after the transport connected.
///
/// A failing entity does not stop the others from being announced; the
/// first error is returned once all entities were tried.
pub fn announce_all(
    transport: &mut dyn HaTransport,
    entities: &mut [&mut dyn HaEntity],
) -> Result<(), HaError> {
    let mut result = Ok(());

    for entity in entities.iter_mut() {
        if let Err(e) = entity.on_connected(transport) {
            warn!(
                "ha: announcing {}/{} failed: {}",
                entity.component().as_str(),
                entity.object_id(),
                e
            );
            if result.is_ok() {
                result = Err(e);
            }
        }
    }

    result
}

/// Deliver an inbound message to the entity owning `topic`.
///
/// Returns `Ok(false)` when no entity claims the topic.
pub fn dispatch_message(
    transport: &mut dyn HaTransport,
    entities: &mut [&mut dyn HaEntity],
    topic: &str,
    payload: &[u8],
) -> Result<bool, HaError> {
    for entity in entities.iter_mut() {
        if entity.on_message(transport, topic, payload)? {
            return Ok(true);
        }
    }

    debug!("ha: no entity handles {}", topic);
    Ok(false)
}

/// Bounded set of entities sharing one transport
pub struct EntityRegistry<'a, const MAX_ENTITIES: usize> {
    entities: Vec<&'a mut dyn HaEntity, MAX_ENTITIES>,
}

impl<'a, const MAX_ENTITIES: usize> EntityRegistry<'a, MAX_ENTITIES> {
    pub const fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Register an entity.
    ///
    /// Returns `Err(HaError::MaxEntitiesReached)` when the registry is full.
    pub fn add(&mut self, entity: &'a mut dyn HaEntity) -> Result<(), HaError> {
        self.entities
            .push(entity)
            .map_err(|_| HaError::MaxEntitiesReached)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// See [`announce_all`]
    pub fn on_connected(&mut self, transport: &mut dyn HaTransport) -> Result<(), HaError> {
        announce_all(transport, &mut self.entities)
    }

    /// See [`dispatch_message`]
    pub fn on_message(
        &mut self,
        transport: &mut dyn HaTransport,
        topic: &str,
        payload: &[u8],
    ) -> Result<bool, HaError> {
        dispatch_message(transport, &mut self.entities, topic, payload)
    }
}

impl<const MAX_ENTITIES: usize> Default for EntityRegistry<'_, MAX_ENTITIES> {
    fn default() -> Self {
        Self::new()
    }
}
