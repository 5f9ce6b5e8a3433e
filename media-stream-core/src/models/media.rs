use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Encoding of a media chunk's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaMimeType {
    #[serde(rename = "audio/pcm")]
    AudioPcm,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
}

impl MediaMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AudioPcm => "audio/pcm",
            Self::ImageJpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for MediaMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discrete unit of encoded media: a JPEG frame or a filled PCM buffer.
///
/// Transient value — produced by capture, handed to the session client,
/// never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaChunk {
    pub payload: Vec<u8>,
    pub mime_type: MediaMimeType,
}

impl MediaChunk {
    pub fn pcm(payload: Vec<u8>) -> Self {
        Self {
            payload,
            mime_type: MediaMimeType::AudioPcm,
        }
    }

    pub fn jpeg(payload: Vec<u8>) -> Self {
        Self {
            payload,
            mime_type: MediaMimeType::ImageJpeg,
        }
    }
}

/// A single rasterized camera frame: tightly packed RGB8, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Byte length of an RGB8 frame with the given dimensions.
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        let expected = Self::expected_len(width, height);
        if data.len() != expected {
            return Err(format!(
                "frame buffer is {} bytes, expected {} for {}x{} RGB8",
                data.len(),
                expected,
                width,
                height
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// Who produced a transcript fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptOrigin {
    User,
    Model,
}

/// A transcript fragment emitted to the host UI. Not stored by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    pub text: String,
    pub origin: TranscriptOrigin,
    pub received_at: DateTime<Utc>,
}

impl TranscriptEvent {
    pub fn new(text: String, origin: TranscriptOrigin) -> Self {
        Self {
            text,
            origin,
            received_at: Utc::now(),
        }
    }
}

/// Model playback state derived from inbound audio events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub is_model_speaking: bool,
    /// Remote output amplitude, 0..=100.
    pub output_level: u8,
}

/// Kind of capture device backing a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaDeviceKind {
    Camera,
    Microphone,
}

/// Descriptive identity of a capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDeviceInfo {
    pub id: String,
    pub name: String,
    pub kind: MediaDeviceKind,
    pub is_default: bool,
}
