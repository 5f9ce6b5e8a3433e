use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::models::error::DeviceError;
use crate::models::media::VideoFrame;

/// Encode a rasterized RGB8 frame as JPEG at the given quality (1..=100).
pub fn encode_jpeg(frame: &VideoFrame, quality: u8) -> Result<Vec<u8>, DeviceError> {
    if frame.data.len() != VideoFrame::expected_len(frame.width, frame.height) {
        return Err(DeviceError::Other(format!(
            "frame buffer does not match {}x{} RGB8",
            frame.width, frame.height
        )));
    }

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| DeviceError::Other(format!("jpeg encoding failed: {e}")))?;
    Ok(out)
}
