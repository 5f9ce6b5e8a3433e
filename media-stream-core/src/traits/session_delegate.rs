use crate::models::error::SessionError;
use crate::models::media::TranscriptEvent;

/// Event delegate for streaming session notifications.
///
/// Methods are called from the session's worker threads, not the UI thread.
/// Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called exactly once per successful connection, after the remote side
    /// has acknowledged setup. Media capture may begin only after this.
    fn on_ready(&self);

    /// Called for each inbound transcript fragment, tagged with its origin.
    fn on_transcription(&self, event: &TranscriptEvent);

    /// Called when model playback starts (`true`) and when every queued
    /// buffer has been rendered (`false`).
    fn on_playback_state_changed(&self, is_model_speaking: bool);

    /// Called with remote output amplitude updates, 0..=100.
    fn on_output_level(&self, level: u8);

    /// Called at most once per connection when it fails.
    fn on_error(&self, error: &SessionError);
}
