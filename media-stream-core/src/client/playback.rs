use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::traits::playback_sink::PlaybackSink;
use crate::traits::session_delegate::SessionDelegate;

/// FIFO of decoded model audio plus the worker that drains it.
///
/// `is_model_speaking` is edge-triggered: it flips true when queued playback
/// begins and false once every queued buffer has been rendered, firing
/// `on_playback_state_changed` on each edge. The sink is loaned to the
/// worker thread for the lifetime of a connection and handed back on `stop`,
/// so one queue serves any number of consecutive connections.
pub struct PlaybackQueue {
    shared: Arc<PlaybackShared>,
    sink_slot: Mutex<Option<Box<dyn PlaybackSink>>>,
    worker: Mutex<Option<thread::JoinHandle<Box<dyn PlaybackSink>>>>,
}

struct PlaybackShared {
    queue: Mutex<VecDeque<Vec<i16>>>,
    available: Condvar,
    running: AtomicBool,
    speaking: AtomicBool,
    sample_rate: u32,
}

impl PlaybackQueue {
    pub fn new(sample_rate: u32, sink: Box<dyn PlaybackSink>) -> Self {
        Self {
            shared: Arc::new(PlaybackShared {
                queue: Mutex::new(VecDeque::new()),
                available: Condvar::new(),
                running: AtomicBool::new(false),
                speaking: AtomicBool::new(false),
                sample_rate,
            }),
            sink_slot: Mutex::new(Some(sink)),
            worker: Mutex::new(None),
        }
    }

    /// Spawn the drain worker. No-op if it is already running.
    pub fn start(&self, delegate: Arc<dyn SessionDelegate>) {
        let Some(mut sink) = self.sink_slot.lock().take() else {
            log::warn!("playback worker already running");
            return;
        };

        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);

        let handle = thread::Builder::new()
            .name("playback-drain".into())
            .spawn(move || {
                drain_loop(&shared, sink.as_mut(), delegate.as_ref());
                sink
            })
            .expect("failed to spawn playback thread");

        *self.worker.lock() = Some(handle);
    }

    /// Queue one decoded buffer for playback.
    pub fn enqueue(&self, samples: Vec<i16>) {
        if !self.shared.running.load(Ordering::SeqCst) {
            log::debug!("playback worker stopped; dropping inbound audio");
            return;
        }
        self.shared.queue.lock().push_back(samples);
        self.shared.available.notify_one();
    }

    /// Drop all queued audio. Playback of the buffer currently being
    /// rendered is not interrupted.
    pub fn clear(&self) {
        self.shared.queue.lock().clear();
        self.shared.available.notify_all();
    }

    pub fn is_speaking(&self) -> bool {
        self.shared.speaking.load(Ordering::SeqCst)
    }

    pub fn queued(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Stop the worker, drop queued audio, and reclaim the sink. Idempotent.
    pub fn stop(&self) {
        self.clear();
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.available.notify_all();

        if let Some(handle) = self.worker.lock().take() {
            match handle.join() {
                Ok(sink) => *self.sink_slot.lock() = Some(sink),
                Err(_) => log::error!("playback worker panicked; sink lost"),
            }
        }
    }
}

fn drain_loop(shared: &PlaybackShared, sink: &mut dyn PlaybackSink, delegate: &dyn SessionDelegate) {
    loop {
        let buffer = {
            let mut queue = shared.queue.lock();
            while queue.is_empty()
                && shared.running.load(Ordering::SeqCst)
                && !shared.speaking.load(Ordering::SeqCst)
            {
                shared.available.wait(&mut queue);
            }
            queue.pop_front()
        };

        match buffer {
            Some(samples) => {
                if !shared.speaking.swap(true, Ordering::SeqCst) {
                    delegate.on_playback_state_changed(true);
                }
                if let Err(e) = sink.play(&samples, shared.sample_rate) {
                    log::warn!("playback sink failed: {e}");
                }
            }
            None => {
                // Queue drained (or shutting down): the speaking window ends.
                if shared.speaking.swap(false, Ordering::SeqCst) {
                    delegate.on_playback_state_changed(false);
                }
                if !shared.running.load(Ordering::SeqCst) {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::models::error::SessionError;
    use crate::models::media::TranscriptEvent;

    struct SlowSink {
        per_buffer: Duration,
        played: Arc<AtomicUsize>,
    }

    impl PlaybackSink for SlowSink {
        fn play(&mut self, _samples: &[i16], _sample_rate: u32) -> Result<(), String> {
            thread::sleep(self.per_buffer);
            self.played.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct StateRecorder {
        changes: Mutex<Vec<bool>>,
    }

    impl SessionDelegate for StateRecorder {
        fn on_ready(&self) {}
        fn on_transcription(&self, _event: &TranscriptEvent) {}
        fn on_playback_state_changed(&self, is_model_speaking: bool) {
            self.changes.lock().push(is_model_speaking);
        }
        fn on_output_level(&self, _level: u8) {}
        fn on_error(&self, _error: &SessionError) {}
    }

    fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if predicate() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        predicate()
    }

    #[test]
    fn speaking_toggles_around_queued_playback() {
        let played = Arc::new(AtomicUsize::new(0));
        let queue = PlaybackQueue::new(
            24000,
            Box::new(SlowSink {
                per_buffer: Duration::from_millis(15),
                played: Arc::clone(&played),
            }),
        );
        let delegate = Arc::new(StateRecorder::default());
        queue.start(Arc::clone(&delegate) as Arc<dyn SessionDelegate>);

        assert!(!queue.is_speaking());
        queue.enqueue(vec![0i16; 64]);
        queue.enqueue(vec![0i16; 64]);

        assert!(wait_until(Duration::from_millis(200), || queue.is_speaking()));
        assert!(wait_until(Duration::from_millis(500), || {
            played.load(Ordering::SeqCst) == 2 && !queue.is_speaking()
        }));

        queue.stop();
        assert_eq!(*delegate.changes.lock(), vec![true, false]);
    }

    #[test]
    fn stop_drops_queued_audio_and_ends_speaking() {
        let played = Arc::new(AtomicUsize::new(0));
        let queue = PlaybackQueue::new(
            24000,
            Box::new(SlowSink {
                per_buffer: Duration::from_millis(30),
                played: Arc::clone(&played),
            }),
        );
        let delegate = Arc::new(StateRecorder::default());
        queue.start(Arc::clone(&delegate) as Arc<dyn SessionDelegate>);

        for _ in 0..10 {
            queue.enqueue(vec![0i16; 64]);
        }
        assert!(wait_until(Duration::from_millis(200), || queue.is_speaking()));

        queue.stop();
        assert!(!queue.is_speaking());
        assert_eq!(queue.queued(), 0);
        // Far fewer buffers rendered than were queued.
        assert!(played.load(Ordering::SeqCst) < 10);

        // Stopping twice is harmless.
        queue.stop();
    }

    #[test]
    fn sink_is_reusable_across_start_stop_cycles() {
        let played = Arc::new(AtomicUsize::new(0));
        let queue = PlaybackQueue::new(
            24000,
            Box::new(SlowSink {
                per_buffer: Duration::from_millis(1),
                played: Arc::clone(&played),
            }),
        );
        let delegate = Arc::new(StateRecorder::default());

        for _ in 0..2 {
            queue.start(Arc::clone(&delegate) as Arc<dyn SessionDelegate>);
            queue.enqueue(vec![0i16; 8]);
            assert!(wait_until(Duration::from_millis(200), || {
                !queue.is_speaking() && queue.queued() == 0
            }));
            queue.stop();
        }

        assert!(played.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn enqueue_after_stop_is_dropped() {
        let queue = PlaybackQueue::new(
            24000,
            Box::new(SlowSink {
                per_buffer: Duration::from_millis(1),
                played: Arc::new(AtomicUsize::new(0)),
            }),
        );
        queue.enqueue(vec![0i16; 8]);
        assert_eq!(queue.queued(), 0);
    }
}
