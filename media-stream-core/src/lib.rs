//! # media-stream-core
//!
//! Platform-agnostic core for streaming live camera and microphone media to
//! a remote multimodal service over a duplex connection, and rendering the
//! text/audio responses it sends back.
//!
//! Device access, the WebSocket transport, and audio output are trait seams;
//! platform backends (see `media-stream-backends`) plug into the generic
//! `MediaCaptureController` and `StreamingSessionClient`.
//!
//! ## Architecture
//!
//! ```text
//! media-stream-core (this crate)
//! ├── traits/       ← CameraProvider, MicrophoneProvider, Transport, MediaSink, delegates
//! ├── models/       ← MediaChunk, ConnectionState, CaptureState, configs, error taxonomy
//! ├── processing/   ← FrameBuffer, PCM math, JPEG encoding
//! ├── wire/         ← JSON envelopes + base64 payload framing
//! ├── client/       ← StreamingSessionClient + playback queue
//! └── session/      ← MediaCaptureController (capture orchestrator)
//! ```
//!
//! Data flow: capture → encoded chunk (image or audio) → session client →
//! wire; inbound wire events → session client → delegate callbacks into the
//! host UI. Capture depends on an established, ready client; the client has
//! no dependency on capture.

pub mod client;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;
pub mod wire;

// Re-export key types at crate root for convenience.
pub use client::playback::PlaybackQueue;
pub use client::session::StreamingSessionClient;
pub use models::config::{CaptureConfig, SessionConfig, SetupConfig};
pub use models::error::{ConnectionError, DeviceError, ProtocolError, SessionError};
pub use models::media::{
    MediaChunk, MediaDeviceInfo, MediaDeviceKind, MediaMimeType, PlaybackState, TranscriptEvent,
    TranscriptOrigin, VideoFrame,
};
pub use models::state::{CaptureState, ConnectionState};
pub use processing::frame_buffer::FrameBuffer;
pub use session::controller::MediaCaptureController;
pub use traits::camera_provider::CameraProvider;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::media_sink::MediaSink;
pub use traits::microphone_provider::{AudioBufferCallback, MicrophoneProvider};
pub use traits::playback_sink::PlaybackSink;
pub use traits::session_delegate::SessionDelegate;
pub use traits::transport::{Transport, TransportConnector};
