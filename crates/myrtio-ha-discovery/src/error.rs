//! Error types for the discovery library

use core::fmt;

/// Failure reported by the transport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No broker connection is open
    NotConnected,
    /// The broker or client refused the request
    Rejected,
    /// Streaming bytes into an open message failed
    WriteFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotConnected => write!(f, "not connected"),
            TransportError::Rejected => write!(f, "request rejected"),
            TransportError::WriteFailed => write!(f, "write failed"),
        }
    }
}

/// Error type for Home Assistant operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaError {
    /// Entity has no object id and cannot be addressed
    MissingObjectId,
    /// Object id contains a character that breaks topics or JSON strings
    InvalidObjectId,
    /// Device descriptor has no unique id or does not serialize
    InvalidDevice,
    /// A document or field could not be serialized
    Serialization,
    /// Topic does not fit into `MAX_TOPIC_LEN`
    TopicTooLong,
    /// Payload does not fit into a single message
    PayloadTooLarge,
    /// The entity was built without the feature this operation needs
    FeatureUnsupported,
    /// Value is outside of the accepted range
    InvalidValue,
    /// Observer list is full
    MaxObserversReached,
    /// Entity list is full
    MaxEntitiesReached,
    /// Transport communication error
    Transport(TransportError),
}

impl fmt::Display for HaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaError::MissingObjectId => write!(f, "Entity has no object id"),
            HaError::InvalidObjectId => write!(f, "Invalid object id"),
            HaError::InvalidDevice => write!(f, "Invalid device descriptor"),
            HaError::Serialization => write!(f, "JSON serialization error"),
            HaError::TopicTooLong => write!(f, "Topic too long"),
            HaError::PayloadTooLarge => write!(f, "Payload too large"),
            HaError::FeatureUnsupported => write!(f, "Feature not enabled"),
            HaError::InvalidValue => write!(f, "Value out of range"),
            HaError::MaxObserversReached => write!(f, "Maximum observers reached"),
            HaError::MaxEntitiesReached => write!(f, "Maximum entities reached"),
            HaError::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl From<TransportError> for HaError {
    fn from(e: TransportError) -> Self {
        HaError::Transport(e)
    }
}
