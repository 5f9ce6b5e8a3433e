use std::sync::Arc;

use crate::models::config::CaptureConfig;
use crate::models::error::DeviceError;
use crate::models::media::MediaDeviceInfo;

/// Callback invoked when a microphone buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples in `[-1.0, 1.0]`.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of channels (1 = mono, 2 = stereo interleaved).
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Interface for microphone capture sources.
pub trait MicrophoneProvider: Send {
    /// Whether an input device is currently present.
    fn is_available(&self) -> bool;

    /// Acquire the device and start delivering buffers via `callback`.
    ///
    /// The config carries the target rate and the processing hints
    /// (echo cancellation, noise suppression, auto gain); providers apply
    /// what their platform supports. The callback fires on a dedicated
    /// audio thread — keep processing minimal.
    fn start(
        &mut self,
        callback: AudioBufferCallback,
        config: &CaptureConfig,
    ) -> Result<(), DeviceError>;

    /// Stop capturing and release the device. Idempotent.
    fn stop(&mut self);

    /// Information about the microphone backing this provider.
    fn device_info(&self) -> MediaDeviceInfo;
}
