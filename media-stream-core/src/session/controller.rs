use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::config::CaptureConfig;
use crate::models::error::DeviceError;
use crate::models::media::MediaChunk;
use crate::models::state::CaptureState;
use crate::processing::frame_buffer::FrameBuffer;
use crate::processing::{jpeg, pcm};
use crate::traits::camera_provider::CameraProvider;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::media_sink::MediaSink;
use crate::traits::microphone_provider::{AudioBufferCallback, MicrophoneProvider};

/// Turns live camera/microphone hardware into a steady stream of media
/// chunks, gated by downstream readiness.
///
/// Generic over its device providers. The controller acquires the camera
/// first, then the microphone; a microphone failure releases the
/// already-acquired camera before the error is surfaced. Chunk production
/// never begins until the sink reports ready, and the half-duplex policy
/// drops outbound audio frames for as long as model audio is playing.
///
/// Data flow:
/// ```text
/// [Camera] → tick (1/s) → JPEG encode ─┐
///                                       ├→ [MediaSink] → wire
/// [Microphone] → mono → 16 kHz → 4096-sample frames → PCM ┘
/// ```
pub struct MediaCaptureController<C: CameraProvider + 'static, M: MicrophoneProvider> {
    camera: Arc<Mutex<C>>,
    microphone: M,
    sink: Arc<dyn MediaSink>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    config: CaptureConfig,

    state: Arc<Mutex<CaptureState>>,
    // Liveness flag checked at the start of every deferred callback.
    live: Arc<AtomicBool>,
    mic_enabled: Arc<AtomicBool>,
    // Re-entrancy guard: only one in-flight start() at a time.
    setup_in_progress: Arc<AtomicBool>,
    frame_buffer: Arc<Mutex<FrameBuffer>>,

    image_handle: Option<thread::JoinHandle<()>>,
}

impl<C: CameraProvider + 'static, M: MicrophoneProvider> MediaCaptureController<C, M> {
    pub fn new(camera: C, microphone: M, sink: Arc<dyn MediaSink>, config: CaptureConfig) -> Self {
        let frame_samples = config.frame_samples;
        Self {
            camera: Arc::new(Mutex::new(camera)),
            microphone,
            sink,
            delegate: None,
            config,
            state: Arc::new(Mutex::new(CaptureState::Idle)),
            live: Arc::new(AtomicBool::new(false)),
            mic_enabled: Arc::new(AtomicBool::new(true)),
            setup_in_progress: Arc::new(AtomicBool::new(false)),
            frame_buffer: Arc::new(Mutex::new(FrameBuffer::new(frame_samples))),
            image_handle: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> CaptureState {
        self.state.lock().clone()
    }

    pub fn is_microphone_enabled(&self) -> bool {
        self.mic_enabled.load(Ordering::SeqCst)
    }

    /// Acquire camera and microphone and begin producing chunks once the
    /// sink reports ready.
    ///
    /// A start while another start is in flight, or while a session is
    /// already active, is ignored rather than raced.
    pub fn start(&mut self) -> Result<(), DeviceError> {
        if self.setup_in_progress.swap(true, Ordering::SeqCst) {
            log::warn!("capture setup already in progress; ignoring start request");
            return Ok(());
        }

        let result = self.start_inner();
        self.setup_in_progress.store(false, Ordering::SeqCst);

        if let Err(ref e) = result {
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(e);
            }
        }
        result
    }

    fn start_inner(&mut self) -> Result<(), DeviceError> {
        if !self.state.lock().is_idle() {
            log::warn!("capture session already active; ignoring start request");
            return Ok(());
        }
        self.config.validate().map_err(DeviceError::Other)?;

        self.set_state(CaptureState::Starting);

        if let Err(e) = self.camera.lock().open() {
            self.set_state(CaptureState::Idle);
            return Err(e);
        }

        self.frame_buffer.lock().reset();
        self.live.store(true, Ordering::SeqCst);

        let callback = self.audio_callback();
        if let Err(e) = self.microphone.start(callback, &self.config) {
            // Release the already-acquired camera before surfacing.
            self.live.store(false, Ordering::SeqCst);
            self.camera.lock().close();
            self.set_state(CaptureState::Idle);
            return Err(e);
        }

        self.spawn_image_ticker();

        let session_id = Uuid::new_v4();
        self.set_state(CaptureState::Active { session_id });
        log::debug!("capture session {session_id} started");
        Ok(())
    }

    /// Stop all capture work and release the devices. Idempotent.
    pub fn stop(&mut self) {
        if self.state.lock().is_idle() {
            return;
        }
        self.set_state(CaptureState::Stopping);
        self.live.store(false, Ordering::SeqCst);

        if let Some(handle) = self.image_handle.take() {
            let _ = handle.join();
        }
        self.microphone.stop();
        self.camera.lock().close();
        self.frame_buffer.lock().reset();

        self.set_state(CaptureState::Idle);
        log::debug!("capture session stopped");
    }

    /// Toggle the microphone without tearing down the capture graph.
    /// Image capture is unaffected.
    pub fn set_microphone_enabled(&self, enabled: bool) {
        self.mic_enabled.store(enabled, Ordering::SeqCst);
        log::debug!(
            "microphone {}",
            if enabled { "enabled" } else { "muted" }
        );
    }

    fn set_state(&self, new_state: CaptureState) {
        *self.state.lock() = new_state.clone();
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    /// Build the microphone buffer callback: downmix, resample to the wire
    /// rate, frame into fixed-size buffers, then emit per completed frame.
    fn audio_callback(&self) -> AudioBufferCallback {
        let live = Arc::clone(&self.live);
        let mic_enabled = Arc::clone(&self.mic_enabled);
        let sink = Arc::clone(&self.sink);
        let delegate = self.delegate.clone();
        let frame_buffer = Arc::clone(&self.frame_buffer);
        let target_rate = self.config.sample_rate as f64;

        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            if !live.load(Ordering::SeqCst) || !mic_enabled.load(Ordering::SeqCst) {
                return;
            }

            let mono = pcm::downmix_to_mono(samples, channels as usize);
            let resampled = pcm::resample_linear(&mono, sample_rate, target_rate);
            let frames = frame_buffer.lock().push(&resampled);

            for frame in frames {
                if !live.load(Ordering::SeqCst) {
                    return;
                }
                if !sink.is_ready() {
                    // Never produce against a connection that is not
                    // established yet.
                    continue;
                }
                if sink.is_model_speaking() {
                    // Half-duplex: drop, do not buffer.
                    log::debug!("model speaking; dropping {}-sample audio frame", frame.len());
                    continue;
                }
                if let Some(ref delegate) = delegate {
                    delegate.on_input_level(pcm::amplitude_level(&frame));
                }
                sink.send_media_chunk(MediaChunk::pcm(pcm::to_i16_pcm(&frame)));
            }
        })
    }

    fn spawn_image_ticker(&mut self) {
        let live = Arc::clone(&self.live);
        let camera = Arc::clone(&self.camera);
        let sink = Arc::clone(&self.sink);
        let interval = self.config.image_interval;
        let quality = self.config.jpeg_quality;

        let handle = thread::Builder::new()
            .name("image-ticker".into())
            .spawn(move || {
                while live.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if !live.load(Ordering::SeqCst) {
                        break;
                    }
                    if !sink.is_ready() {
                        continue;
                    }

                    let frame = match camera.lock().capture_frame() {
                        Ok(frame) => frame,
                        Err(e) => {
                            log::warn!("frame grab failed: {e}");
                            continue;
                        }
                    };
                    match jpeg::encode_jpeg(&frame, quality) {
                        Ok(bytes) => sink.send_media_chunk(MediaChunk::jpeg(bytes)),
                        Err(e) => log::warn!("jpeg encode failed: {e}"),
                    }
                }
            })
            .expect("failed to spawn image ticker thread");

        self.image_handle = Some(handle);
    }
}

impl<C: CameraProvider + 'static, M: MicrophoneProvider> Drop for MediaCaptureController<C, M> {
    fn drop(&mut self) {
        self.stop();
    }
}
