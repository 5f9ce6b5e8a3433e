use thiserror::Error;

/// Errors raised while acquiring or driving capture devices.
///
/// Recovery: abort the start operation, release anything already acquired,
/// and surface to the caller. A new `start()` may be attempted at any time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not found")]
    NotFound,

    #[error("device error: {0}")]
    Other(String),
}

/// Errors raised by the duplex connection.
///
/// Every variant forces the session to `Disconnected`; none is retried
/// automatically — reconnection policy belongs to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("handshake timed out")]
    HandshakeTimeout,

    #[error("transport closed")]
    TransportClosed,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("a connection is already active")]
    AlreadyConnected,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// A malformed inbound frame. Logged and dropped; the connection stays open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed inbound frame: {0}")]
    MalformedFrame(String),
}

/// Top-level error surfaced through `SessionDelegate::on_error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
