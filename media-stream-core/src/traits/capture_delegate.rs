use crate::models::error::DeviceError;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// Methods are called from capture worker threads; marshal to the UI thread
/// if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the capture session state changes.
    fn on_state_changed(&self, state: &CaptureState);

    /// Called with the microphone input amplitude (0..=100) once per
    /// completed audio frame.
    fn on_input_level(&self, level: u8);

    /// Called when a device error aborts the session.
    fn on_error(&self, error: &DeviceError);
}
