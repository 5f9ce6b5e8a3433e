pub mod camera_provider;
pub mod capture_delegate;
pub mod media_sink;
pub mod microphone_provider;
pub mod playback_sink;
pub mod session_delegate;
pub mod transport;
