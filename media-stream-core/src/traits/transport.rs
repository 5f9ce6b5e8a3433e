use crate::models::error::ConnectionError;

/// A single duplex text-frame transport (in practice, a WebSocket).
///
/// The session client serializes access: sends and receives never run
/// concurrently on the same transport.
pub trait Transport: Send {
    /// Transmit one text frame.
    fn send(&mut self, frame: &str) -> Result<(), ConnectionError>;

    /// Poll for one inbound text frame.
    ///
    /// Returns `Ok(None)` when nothing is pending yet; implementations
    /// should bound the wait to roughly the caller's poll interval.
    /// `Err(ConnectionError::TransportClosed)` once the peer has closed.
    fn try_recv(&mut self) -> Result<Option<String>, ConnectionError>;

    /// Close the transport. Idempotent.
    fn close(&mut self);
}

/// Dials a fresh transport for each connection attempt.
pub trait TransportConnector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn Transport>, ConnectionError>;
}
