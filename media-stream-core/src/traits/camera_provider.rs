use crate::models::error::DeviceError;
use crate::models::media::{MediaDeviceInfo, VideoFrame};

/// Interface for camera capture sources.
///
/// Implemented by platform backends (e.g. a nokhwa-based camera) and by the
/// fakes used in tests. The controller pulls one frame per image tick, so
/// `capture_frame` should return the most recent frame without blocking for
/// a new exposure.
pub trait CameraProvider: Send {
    /// Whether a camera is currently present.
    fn is_available(&self) -> bool;

    /// Acquire the device and start its stream.
    ///
    /// Fails with `DeviceError::PermissionDenied` or `NotFound` when access
    /// is rejected; the provider must hold no resources after a failure.
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Rasterize the current video frame as tightly packed RGB8.
    fn capture_frame(&mut self) -> Result<VideoFrame, DeviceError>;

    /// Release the device. Idempotent.
    fn close(&mut self);

    /// Information about the camera backing this provider.
    fn device_info(&self) -> MediaDeviceInfo;
}
