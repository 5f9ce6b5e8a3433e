/// Fixed-size audio framing buffer.
///
/// Accumulates mono f32 samples and cuts them into frames of exactly
/// `frame_samples` (4096 at 16 kHz by default). One completed frame becomes
/// one outbound `audio/pcm` chunk; the remainder stays pending until the
/// next push.
#[derive(Debug)]
pub struct FrameBuffer {
    frame_samples: usize,
    pending: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(frame_samples: usize) -> Self {
        Self {
            frame_samples,
            pending: Vec::with_capacity(frame_samples),
        }
    }

    /// Append samples, returning every frame completed by this push.
    ///
    /// Usually zero or one frame; a push larger than `frame_samples` can
    /// complete several.
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.pending.extend_from_slice(samples);

        let mut frames = Vec::new();
        while self.pending.len() >= self.frame_samples {
            let rest = self.pending.split_off(self.frame_samples);
            frames.push(std::mem::replace(&mut self.pending, rest));
        }
        frames
    }

    /// Samples accumulated toward the next frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The configured frame size.
    pub fn frame_samples(&self) -> usize {
        self.frame_samples
    }

    /// Discard any partially accumulated frame.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_push_completes_nothing() {
        let mut buf = FrameBuffer::new(4);
        assert!(buf.push(&[0.1, 0.2, 0.3]).is_empty());
        assert_eq!(buf.pending(), 3);
    }

    #[test]
    fn exact_fill_completes_one_frame() {
        let mut buf = FrameBuffer::new(4);
        let frames = buf.push(&[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(frames, vec![vec![0.1, 0.2, 0.3, 0.4]]);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn remainder_carries_into_next_frame() {
        let mut buf = FrameBuffer::new(4);
        assert!(buf.push(&[1.0, 2.0]).is_empty());

        let frames = buf.push(&[3.0, 4.0, 5.0]);
        assert_eq!(frames, vec![vec![1.0, 2.0, 3.0, 4.0]]);
        assert_eq!(buf.pending(), 1);
    }

    #[test]
    fn large_push_completes_multiple_frames() {
        let mut buf = FrameBuffer::new(2);
        let frames = buf.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(frames, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(buf.pending(), 1);
    }

    #[test]
    fn reset_discards_pending() {
        let mut buf = FrameBuffer::new(4);
        buf.push(&[1.0, 2.0, 3.0]);
        buf.reset();
        assert_eq!(buf.pending(), 0);

        // A fresh frame starts from scratch after reset.
        let frames = buf.push(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frames.len(), 1);
    }
}
