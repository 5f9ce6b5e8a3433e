use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::config::SessionConfig;
use crate::models::error::{ConnectionError, SessionError};
use crate::models::media::{MediaChunk, PlaybackState, TranscriptEvent};
use crate::models::state::ConnectionState;
use crate::traits::media_sink::MediaSink;
use crate::traits::playback_sink::PlaybackSink;
use crate::traits::session_delegate::SessionDelegate;
use crate::traits::transport::{Transport, TransportConnector};
use crate::wire::{self, ClientMessage, ServerMessage};

use super::playback::PlaybackQueue;

/// Owner of exactly one duplex connection per active session.
///
/// Enforces ordering between connection readiness and chunk transmission:
/// the `on_ready` callback fires only after the remote side acknowledges
/// setup, and every send is a silent no-op unless the state machine is in
/// `Connected`. Inbound frames are demultiplexed on a dedicated reader
/// thread into transcript, playback-audio, and output-level callbacks.
///
/// No automatic reconnect: every failure forces `Disconnected` and is
/// surfaced at most once; retrying is the caller's decision.
pub struct StreamingSessionClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: SessionConfig,
    connector: Box<dyn TransportConnector>,
    delegate: Arc<dyn SessionDelegate>,
    state: Mutex<ConnectionState>,
    transport: Mutex<Option<Box<dyn Transport>>>,
    playback: PlaybackQueue,
    output_level: AtomicU8,
    reader_running: AtomicBool,
    reader_handle: Mutex<Option<thread::JoinHandle<()>>>,
    // Single-closer election for teardown; reset on each connect.
    closing: AtomicBool,
    error_reported: AtomicBool,
}

impl StreamingSessionClient {
    pub fn new(
        connector: Box<dyn TransportConnector>,
        playback_sink: Box<dyn PlaybackSink>,
        delegate: Arc<dyn SessionDelegate>,
        config: SessionConfig,
    ) -> Self {
        let playback = PlaybackQueue::new(config.playback_sample_rate, playback_sink);
        Self {
            inner: Arc::new(ClientInner {
                config,
                connector,
                delegate,
                state: Mutex::new(ConnectionState::Disconnected),
                transport: Mutex::new(None),
                playback,
                output_level: AtomicU8::new(0),
                reader_running: AtomicBool::new(false),
                reader_handle: Mutex::new(None),
                closing: AtomicBool::new(false),
                error_reported: AtomicBool::new(false),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    /// Whether the handshake has completed and sends are permitted.
    pub fn is_ready(&self) -> bool {
        self.state().is_connected()
    }

    pub fn is_model_speaking(&self) -> bool {
        self.inner.playback.is_speaking()
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            is_model_speaking: self.inner.playback.is_speaking(),
            output_level: self.inner.output_level.load(Ordering::SeqCst),
        }
    }

    /// Open the transport, perform the setup handshake, and fire `on_ready`.
    ///
    /// Any failure before the handshake completes transitions back to
    /// `Disconnected` without firing `on_ready`.
    pub fn connect(&self) -> Result<(), ConnectionError> {
        self.inner
            .config
            .validate()
            .map_err(ConnectionError::InvalidConfiguration)?;

        {
            let mut state = self.inner.state.lock();
            if !state.is_disconnected() {
                return Err(ConnectionError::AlreadyConnected);
            }
            *state = ConnectionState::Connecting;
        }
        self.inner.closing.store(false, Ordering::SeqCst);
        self.inner.error_reported.store(false, Ordering::SeqCst);
        self.inner.output_level.store(0, Ordering::SeqCst);

        let mut transport = match self.inner.connector.connect() {
            Ok(t) => t,
            Err(e) => {
                *self.inner.state.lock() = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        let setup = ClientMessage::Setup {
            config: self.inner.config.setup.clone(),
        };
        let mut handshake = transport.send(&setup.to_json());
        if handshake.is_ok() {
            handshake = self.await_setup_complete(transport.as_mut());
        }
        if let Err(e) = handshake {
            transport.close();
            *self.inner.state.lock() = ConnectionState::Disconnected;
            return Err(e);
        }

        *self.inner.transport.lock() = Some(transport);
        *self.inner.state.lock() = ConnectionState::Connected;
        self.inner.playback.start(Arc::clone(&self.inner.delegate));
        self.spawn_reader();

        log::debug!("session connected; setup acknowledged");
        self.inner.delegate.on_ready();
        Ok(())
    }

    /// Frame and transmit one media chunk. Silent no-op unless `Connected`.
    pub fn send_media_chunk(&self, chunk: MediaChunk) {
        if !self.is_ready() {
            log::debug!("dropping {} chunk: session not connected", chunk.mime_type);
            return;
        }
        self.send_frame(ClientMessage::MediaChunk {
            mime_type: chunk.mime_type,
            data: wire::encode_payload(&chunk.payload),
        });
    }

    /// Transmit a user text message. Silent no-op unless `Connected`.
    pub fn send_text_message(&self, text: &str) {
        if !self.is_ready() {
            log::debug!("dropping text message: session not connected");
            return;
        }
        self.send_frame(ClientMessage::TextMessage {
            text: text.to_string(),
        });
    }

    /// Force the session to `Disconnected`. Safe to call from any state and
    /// any number of times.
    pub fn disconnect(&self) {
        self.inner.teardown(true);
    }

    fn await_setup_complete(&self, transport: &mut dyn Transport) -> Result<(), ConnectionError> {
        let deadline = Instant::now() + self.inner.config.handshake_timeout;
        loop {
            match transport.try_recv()? {
                Some(raw) => match wire::parse_server_message(&raw) {
                    Ok(ServerMessage::SetupComplete) => return Ok(()),
                    Ok(other) => log::debug!("ignoring pre-ready frame: {other:?}"),
                    Err(e) => log::warn!("dropping frame during handshake: {e}"),
                },
                None => {
                    if Instant::now() >= deadline {
                        return Err(ConnectionError::HandshakeTimeout);
                    }
                    thread::sleep(self.inner.config.poll_interval);
                }
            }
        }
    }

    fn spawn_reader(&self) {
        self.inner.reader_running.store(true, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let handle = thread::Builder::new()
            .name("session-reader".into())
            .spawn(move || reader_loop(&inner))
            .expect("failed to spawn reader thread");
        *self.inner.reader_handle.lock() = Some(handle);
    }

    fn send_frame(&self, msg: ClientMessage) {
        let json = msg.to_json();
        let result = {
            let mut guard = self.inner.transport.lock();
            match guard.as_mut() {
                Some(transport) => transport.send(&json),
                None => return,
            }
        };
        if let Err(e) = result {
            log::error!("send failed: {e}");
            self.inner.report_error_once(e);
            self.inner.teardown(true);
        }
    }
}

impl Drop for StreamingSessionClient {
    fn drop(&mut self) {
        self.inner.teardown(true);
    }
}

impl MediaSink for StreamingSessionClient {
    fn is_ready(&self) -> bool {
        StreamingSessionClient::is_ready(self)
    }

    fn is_model_speaking(&self) -> bool {
        StreamingSessionClient::is_model_speaking(self)
    }

    fn send_media_chunk(&self, chunk: MediaChunk) {
        StreamingSessionClient::send_media_chunk(self, chunk)
    }
}

impl ClientInner {
    /// Surface a connection failure through the delegate, at most once per
    /// connection.
    fn report_error_once(&self, error: ConnectionError) {
        if !self.error_reported.swap(true, Ordering::SeqCst) {
            self.delegate.on_error(&SessionError::Connection(error));
        }
    }

    /// Release the connection. The first caller wins the closer election;
    /// later callers (including redundant `disconnect()`s) return
    /// immediately. `join_reader` is false only on the reader thread's own
    /// error path, since it cannot join itself.
    fn teardown(&self, join_reader: bool) {
        if self.state.lock().is_disconnected() && !self.closing.load(Ordering::SeqCst) {
            return;
        }
        if self.closing.swap(true, Ordering::SeqCst) {
            return;
        }

        *self.state.lock() = ConnectionState::Closing;
        self.reader_running.store(false, Ordering::SeqCst);

        let handle = self.reader_handle.lock().take();
        if let Some(handle) = handle {
            if join_reader {
                let _ = handle.join();
            }
        }

        if let Some(mut transport) = self.transport.lock().take() {
            transport.close();
        }
        self.playback.stop();

        *self.state.lock() = ConnectionState::Disconnected;
        self.closing.store(false, Ordering::SeqCst);
        log::debug!("session disconnected");
    }

    fn handle_frame(&self, raw: &str) {
        match wire::parse_server_message(raw) {
            Ok(ServerMessage::SetupComplete) => {
                log::debug!("duplicate setup_complete ignored");
            }
            Ok(ServerMessage::Transcript { text, origin }) => {
                self.delegate
                    .on_transcription(&TranscriptEvent::new(text, origin));
            }
            Ok(ServerMessage::AudioChunk { data }) => match wire::decode_payload(&data) {
                Ok(bytes) => self.playback.enqueue(wire::decode_pcm16(&bytes)),
                // Malformed frame: drop it, connection stays open.
                Err(e) => log::warn!("{e}"),
            },
            Ok(ServerMessage::OutputLevel { level }) => {
                let level = level.min(100);
                self.output_level.store(level, Ordering::SeqCst);
                self.delegate.on_output_level(level);
            }
            Err(e) => log::warn!("{e}"),
        }
    }
}

fn reader_loop(inner: &Arc<ClientInner>) {
    while inner.reader_running.load(Ordering::SeqCst) {
        let received = {
            let mut guard = inner.transport.lock();
            match guard.as_mut() {
                Some(transport) => transport.try_recv(),
                None => break,
            }
        };

        match received {
            Ok(Some(raw)) => inner.handle_frame(&raw),
            Ok(None) => thread::sleep(inner.config.poll_interval),
            Err(e) => {
                if inner.reader_running.load(Ordering::SeqCst) {
                    log::error!("transport failed: {e}");
                    inner.report_error_once(e);
                    inner.teardown(false);
                }
                break;
            }
        }
    }
}
