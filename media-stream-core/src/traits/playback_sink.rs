/// Renders decoded model audio locally.
///
/// `play` blocks until the buffer has been rendered; the playback worker
/// uses that to track when queued playback drains.
pub trait PlaybackSink: Send {
    fn play(&mut self, samples: &[i16], sample_rate: u32) -> Result<(), String>;
}
