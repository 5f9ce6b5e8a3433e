use uuid::Uuid;

/// Connection state machine for the streaming session client.
///
/// State transitions:
/// ```text
/// disconnected → connecting → connected → closing → disconnected
///                     ↓ (handshake failure)
///                disconnected
/// ```
///
/// `connect()` is the only transition out of `Disconnected`; `disconnect()`
/// forces `Disconnected` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl ConnectionState {
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// Whether chunk and text sends are permitted.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → active → stopping → idle
///            ↓ (device failure)
///          idle
/// ```
///
/// At most one `Active` session exists at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Starting,
    Active { session_id: Uuid },
    Stopping,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Identity of the active session, if any.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Self::Active { session_id } => Some(*session_id),
            _ => None,
        }
    }
}
