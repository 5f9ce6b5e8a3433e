//! Local playback sink over rodio.
//!
//! The rodio output stream is not `Send`, so a dedicated thread owns it and
//! `play` blocks on an ack sent once the buffer has been rendered.

use std::sync::mpsc;
use std::thread;

use media_stream_core::traits::playback_sink::PlaybackSink;

enum SinkCommand {
    Play {
        samples: Vec<i16>,
        sample_rate: u32,
        done: mpsc::Sender<Result<(), String>>,
    },
    Shutdown,
}

/// Renders mono PCM through the system default output device.
pub struct RodioPlayback {
    commands: mpsc::Sender<SinkCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl RodioPlayback {
    pub fn new() -> Self {
        let (commands, rx) = mpsc::channel::<SinkCommand>();

        let worker = thread::Builder::new()
            .name("rodio-output".into())
            .spawn(move || output_loop(rx))
            .expect("failed to spawn audio output thread");

        Self {
            commands,
            worker: Some(worker),
        }
    }
}

impl Default for RodioPlayback {
    fn default() -> Self {
        Self::new()
    }
}

fn output_loop(rx: mpsc::Receiver<SinkCommand>) {
    let (stream, handle) = match rodio::OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("no audio output device: {e}");
            drain_with_error(rx, e.to_string());
            return;
        }
    };
    let sink = match rodio::Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            log::error!("failed to open audio sink: {e}");
            drain_with_error(rx, e.to_string());
            return;
        }
    };
    // The stream must stay alive for as long as the sink plays.
    let _stream = stream;

    while let Ok(command) = rx.recv() {
        match command {
            SinkCommand::Play {
                samples,
                sample_rate,
                done,
            } => {
                sink.append(rodio::buffer::SamplesBuffer::new(1, sample_rate, samples));
                sink.sleep_until_end();
                let _ = done.send(Ok(()));
            }
            SinkCommand::Shutdown => break,
        }
    }
}

/// Fail every queued play request when no output device could be opened.
fn drain_with_error(rx: mpsc::Receiver<SinkCommand>, error: String) {
    while let Ok(command) = rx.recv() {
        match command {
            SinkCommand::Play { done, .. } => {
                let _ = done.send(Err(error.clone()));
            }
            SinkCommand::Shutdown => break,
        }
    }
}

impl PlaybackSink for RodioPlayback {
    fn play(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), String> {
        let (done_tx, done_rx) = mpsc::channel();
        self.commands
            .send(SinkCommand::Play {
                samples: samples.to_vec(),
                sample_rate,
                done: done_tx,
            })
            .map_err(|_| "audio output thread is gone".to_string())?;
        done_rx
            .recv()
            .map_err(|_| "audio output thread is gone".to_string())?
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        let _ = self.commands.send(SinkCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
