use crate::models::media::MediaChunk;

/// Downstream consumer of capture output.
///
/// Implemented by `StreamingSessionClient`; the capture controller holds the
/// client through this seam instead of reaching through ambient state, and
/// tests substitute a recording fake.
pub trait MediaSink: Send + Sync {
    /// Whether the sink has completed its handshake and accepts chunks.
    fn is_ready(&self) -> bool;

    /// Whether model audio is currently playing (half-duplex gate).
    fn is_model_speaking(&self) -> bool;

    /// Consume one chunk. Must be a silent no-op when the sink is not ready.
    fn send_media_chunk(&self, chunk: MediaChunk);
}
