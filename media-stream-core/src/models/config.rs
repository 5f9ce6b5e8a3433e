use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a capture session.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target audio sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Audio channel count; the outbound stream is mono.
    pub channels: u16,

    /// Samples per outbound audio frame (default: 4096).
    pub frame_samples: usize,

    /// Interval between image captures (default: 1 s).
    pub image_interval: Duration,

    /// JPEG quality, 1..=100 (default: 80).
    pub jpeg_quality: u8,

    /// Processing hints forwarded to the microphone provider.
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.channels != 1 {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if self.frame_samples == 0 {
            return Err("frame size must be positive".into());
        }
        if self.image_interval.is_zero() {
            return Err("image interval must be positive".into());
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!("jpeg quality out of range: {}", self.jpeg_quality));
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            frame_samples: 4096,
            image_interval: Duration::from_secs(1),
            jpeg_quality: 80,
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// Payload of the setup envelope sent immediately after the transport opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupConfig {
    pub input_sample_rate: u32,
    pub input_channels: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub system_instruction: Option<String>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            input_sample_rate: 16000,
            input_channels: 1,
            system_instruction: None,
        }
    }
}

/// Configuration for a streaming session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait for `setup_complete` before the connection attempt
    /// fails (default: 10 s).
    pub handshake_timeout: Duration,

    /// Sleep between transport polls (default: 10 ms).
    pub poll_interval: Duration,

    /// Sample rate of inbound playback audio (default: 24000).
    pub playback_sample_rate: u32,

    /// Setup payload for the handshake.
    pub setup: SetupConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(10),
            playback_sample_rate: 24000,
            setup: SetupConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.handshake_timeout.is_zero() {
            return Err("handshake timeout must be positive".into());
        }
        if self.poll_interval.is_zero() {
            return Err("poll interval must be positive".into());
        }
        if self.poll_interval >= self.handshake_timeout {
            return Err("poll interval must be shorter than the handshake timeout".into());
        }
        if self.playback_sample_rate == 0 {
            return Err("playback sample rate must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CaptureConfig::default().validate().is_ok());
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let config = CaptureConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_stereo_capture() {
        let config = CaptureConfig {
            channels: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_jpeg_quality() {
        let config = CaptureConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CaptureConfig {
            jpeg_quality: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_poll_interval_longer_than_handshake_timeout() {
        let config = SessionConfig {
            handshake_timeout: Duration::from_millis(5),
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
