//! # media-stream-backends
//!
//! Concrete backends for `media-stream-core`'s trait seams:
//! - `CpalMicrophone` — microphone capture via cpal
//! - `NokhwaCamera` — camera capture via nokhwa
//! - `WsConnector` / `WsTransport` — WebSocket transport via tungstenite + native-tls
//! - `RodioPlayback` — local audio output via rodio
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//!
//! use media_stream_backends::{CpalMicrophone, NokhwaCamera, RodioPlayback, WsConnector};
//! use media_stream_core::{
//!     CaptureConfig, MediaCaptureController, MediaSink, SessionConfig, StreamingSessionClient,
//! };
//!
//! let client = Arc::new(StreamingSessionClient::new(
//!     Box::new(WsConnector::new("wss://service.example/session")),
//!     Box::new(RodioPlayback::new()),
//!     delegate,
//!     SessionConfig::default(),
//! ));
//! let mut capture = MediaCaptureController::new(
//!     NokhwaCamera::default_device(),
//!     CpalMicrophone::default_device(),
//!     Arc::clone(&client) as Arc<dyn MediaSink>,
//!     CaptureConfig::default(),
//! );
//! client.connect()?;
//! capture.start()?;
//! ```

pub mod cpal_microphone;
pub mod nokhwa_camera;
pub mod rodio_playback;
pub mod ws_transport;

pub use cpal_microphone::CpalMicrophone;
pub use nokhwa_camera::NokhwaCamera;
pub use rodio_playback::RodioPlayback;
pub use ws_transport::{WsConnector, WsTransport};
