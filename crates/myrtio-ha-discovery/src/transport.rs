//! Transport seam
//!
//! The MQTT client itself lives outside this crate. Entities only see this
//! object-safe trait and borrow it for the duration of a single call, so the
//! same client can serve every entity of the device.

use crate::error::TransportError;

/// Synchronous publish/subscribe transport used by entities.
///
/// Every method returns immediately. A message can be sent either in one
/// piece with [`publish`](HaTransport::publish) or streamed with
/// [`begin_publish`](HaTransport::begin_publish),
/// [`write_bytes`](HaTransport::write_bytes) and
/// [`end_publish`](HaTransport::end_publish), in which case the total length
/// is announced upfront and exactly that many bytes follow.
pub trait HaTransport {
    /// Publish a complete message
    fn publish(&mut self, topic: &str, payload: &[u8], retain: bool) -> Result<(), TransportError>;

    /// Open a message of exactly `length` bytes
    fn begin_publish(&mut self, topic: &str, length: u16, retain: bool)
    -> Result<(), TransportError>;

    /// Append bytes to the open message
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Finish the open message
    fn end_publish(&mut self) -> Result<(), TransportError>;

    /// Subscribe to a topic
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;
}
