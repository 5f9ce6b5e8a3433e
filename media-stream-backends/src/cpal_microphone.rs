//! Microphone capture provider over cpal.
//!
//! cpal streams are not `Send`, so the stream is built and owned by a
//! dedicated capture thread; build errors travel back over a channel so
//! `start()` can fail with a typed `DeviceError`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;

use media_stream_core::models::config::CaptureConfig;
use media_stream_core::models::error::DeviceError;
use media_stream_core::models::media::{MediaDeviceInfo, MediaDeviceKind};
use media_stream_core::traits::microphone_provider::{AudioBufferCallback, MicrophoneProvider};

/// Capture from the system default input device.
///
/// Buffers are delivered at the device's native rate and channel count; the
/// capture controller handles downmix and resampling.
pub struct CpalMicrophone {
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalMicrophone {
    pub fn default_device() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }
}

impl Default for CpalMicrophone {
    fn default() -> Self {
        Self::default_device()
    }
}

impl MicrophoneProvider for CpalMicrophone {
    fn is_available(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    fn start(
        &mut self,
        callback: AudioBufferCallback,
        config: &CaptureConfig,
    ) -> Result<(), DeviceError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(DeviceError::Other("microphone capture already running".into()));
        }

        // cpal exposes no echo-cancellation or gain controls; the hints are
        // recorded so platform-level processing can be diagnosed.
        log::debug!(
            "mic hints: echo_cancellation={} noise_suppression={} auto_gain_control={}",
            config.echo_cancellation,
            config.noise_suppression,
            config.auto_gain_control
        );

        let running = Arc::clone(&self.running);
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("cpal-mic-capture".into())
            .spawn(move || {
                let stream = match build_input_stream(callback) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(DeviceError::Other(format!(
                        "failed to start input stream: {e}"
                    ))));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                // Keep the stream alive until stop().
                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(50));
                }
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                DeviceError::Other(format!("failed to spawn mic thread: {e}"))
            })?;

        *self.capture_handle.lock() = Some(handle);

        let outcome = match ready_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DeviceError::Other(
                "timed out waiting for the input stream".into(),
            )),
        };

        if outcome.is_err() {
            self.stop();
        }
        outcome
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.lock().take() {
            let _ = handle.join();
        }
    }

    fn device_info(&self) -> MediaDeviceInfo {
        let name = cpal::default_host()
            .default_input_device()
            .and_then(|d| d.name().ok())
            .unwrap_or_else(|| "Default Microphone".into());
        MediaDeviceInfo {
            id: "default-input".into(),
            name,
            kind: MediaDeviceKind::Microphone,
            is_default: true,
        }
    }
}

fn err_fn(err: cpal::StreamError) {
    log::error!("input stream error: {err}");
}

/// Build an input stream on the capture thread, adapting the device's
/// sample format to the f32 buffer callback.
fn build_input_stream(callback: AudioBufferCallback) -> Result<cpal::Stream, DeviceError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(DeviceError::NotFound)?;
    let supported = device
        .default_input_config()
        .map_err(|e| DeviceError::Other(format!("no default input config: {e}")))?;

    let sample_rate = supported.sample_rate().0 as f64;
    let channels = supported.channels();
    let stream_config = supported.config();

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                callback(data, sample_rate, channels);
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let floats: Vec<f32> = data.iter().map(|&s| s as f32 / 32768.0).collect();
                callback(&floats, sample_rate, channels);
            },
            err_fn,
            None,
        ),
        other => {
            return Err(DeviceError::Other(format!(
                "unsupported sample format: {other:?}"
            )))
        }
    };

    stream.map_err(map_build_error)
}

fn map_build_error(error: cpal::BuildStreamError) -> DeviceError {
    match error {
        cpal::BuildStreamError::DeviceNotAvailable => DeviceError::NotFound,
        other => DeviceError::Other(other.to_string()),
    }
}
