//! Camera capture provider over nokhwa.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};

use media_stream_core::models::error::DeviceError;
use media_stream_core::models::media::{MediaDeviceInfo, MediaDeviceKind, VideoFrame};
use media_stream_core::traits::camera_provider::CameraProvider;

/// Capture from a nokhwa-backed camera, decoding each buffer to RGB8.
pub struct NokhwaCamera {
    index: CameraIndex,
    camera: Option<Camera>,
}

impl NokhwaCamera {
    pub fn default_device() -> Self {
        Self {
            index: CameraIndex::Index(0),
            camera: None,
        }
    }

    pub fn with_index(index: u32) -> Self {
        Self {
            index: CameraIndex::Index(index),
            camera: None,
        }
    }
}

impl Default for NokhwaCamera {
    fn default() -> Self {
        Self::default_device()
    }
}

impl CameraProvider for NokhwaCamera {
    fn is_available(&self) -> bool {
        nokhwa::query(ApiBackend::Auto)
            .map(|cameras| !cameras.is_empty())
            .unwrap_or(false)
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.camera.is_some() {
            return Ok(());
        }
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(self.index.clone(), requested).map_err(map_open_error)?;
        camera.open_stream().map_err(map_open_error)?;
        self.camera = Some(camera);
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<VideoFrame, DeviceError> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| DeviceError::Other("camera is not open".into()))?;
        let buffer = camera
            .frame()
            .map_err(|e| DeviceError::Other(format!("frame grab failed: {e}")))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| DeviceError::Other(format!("frame decode failed: {e}")))?;

        let (width, height) = (decoded.width(), decoded.height());
        VideoFrame::new(width, height, decoded.into_raw()).map_err(DeviceError::Other)
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {e}");
            }
        }
    }

    fn device_info(&self) -> MediaDeviceInfo {
        let name = self
            .camera
            .as_ref()
            .map(|c| c.info().human_name())
            .unwrap_or_else(|| "Default Camera".into());
        let id = match &self.index {
            CameraIndex::Index(i) => format!("camera-{i}"),
            CameraIndex::String(s) => s.clone(),
        };
        MediaDeviceInfo {
            id,
            name,
            kind: MediaDeviceKind::Camera,
            is_default: matches!(self.index, CameraIndex::Index(0)),
        }
    }
}

/// Platform backends report permission rejections as free-form text, so the
/// mapping is by message; device-open failures map to `NotFound`.
fn map_open_error(error: NokhwaError) -> DeviceError {
    let text = error.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("permission") || lowered.contains("denied") || lowered.contains("access") {
        return DeviceError::PermissionDenied;
    }
    match error {
        NokhwaError::OpenDeviceError(_, _) => DeviceError::NotFound,
        _ => DeviceError::Other(text),
    }
}
