//! Transport abstraction for the long-poll command channel.
//!
//! Concrete implementations:
//! - the Telegram bot API over HTTPS ([`crate::adapters::telegram`])
//! - recording mocks in the integration tests
//!
//! The engine is generic over `UpdateTransport`, so swapping the chat
//! service requires zero changes to the command rules.

use crate::error::TransportError;

/// Request/reply channel the command engine polls.
pub trait UpdateTransport {
    /// Issue one long-poll request starting at `offset` and return the raw
    /// reply body.
    fn fetch_updates(&mut self, offset: i64) -> Result<String, TransportError>;

    /// Publish the command menu (`body` is the encoded command list).
    fn register_commands(&mut self, body: &str) -> Result<(), TransportError>;
}
