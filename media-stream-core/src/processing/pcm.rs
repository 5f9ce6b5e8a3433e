//! Pure sample math for the outbound audio path.
//!
//! All operations work on `&[f32]` buffers with no platform dependencies:
//! downmix to mono, linear-interpolation resampling to the wire rate,
//! conversion to 16-bit little-endian PCM, and the 0–100 amplitude meter.

/// Downmix interleaved multi-channel audio to mono by averaging channels per frame.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let frame_count = samples.len() / channels;
    let scale = 1.0 / channels as f32;
    let mut mono = Vec::with_capacity(frame_count);
    for frame in 0..frame_count {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += samples[frame * channels + ch];
        }
        mono.push(sum * scale);
    }
    mono
}

/// Linear interpolation resampling for mono audio.
///
/// Returns the input unchanged if the rates already match.
pub fn resample_linear(samples: &[f32], source_rate: f64, target_rate: f64) -> Vec<f32> {
    if (source_rate - target_rate).abs() < 0.01 || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = target_rate / source_rate;
    let output_count = (samples.len() as f64 * ratio) as usize;
    if output_count == 0 {
        return Vec::new();
    }

    let mut output = vec![0.0f32; output_count];
    for (i, sample) in output.iter_mut().enumerate() {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        if index + 1 < samples.len() {
            *sample = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
        } else if index < samples.len() {
            *sample = samples[index];
        }
    }
    output
}

/// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM (little-endian bytes).
///
/// Clamps out-of-range values. Output length = `samples.len() * 2` bytes.
pub fn to_i16_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        data.extend_from_slice(&value.to_le_bytes());
    }
    data
}

/// RMS level of samples (0.0–1.0 for normalized audio).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Amplitude meter for UI feedback: RMS scaled to 0..=100.
pub fn amplitude_level(samples: &[f32]) -> u8 {
    (rms_level(samples) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn downmix_stereo_to_mono() {
        let stereo = [0.2, 0.8, 0.4, 0.6];
        let mono = downmix_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert_abs_diff_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(resample_linear(&samples, 16000.0, 16000.0), samples);
    }

    #[test]
    fn resample_upsample_2x() {
        let result = resample_linear(&[0.0, 1.0], 8000.0, 16000.0);

        // 2 samples at 8 kHz → 4 samples at 16 kHz
        assert_eq!(result.len(), 4);
        assert_abs_diff_eq!(result[0], 0.0, epsilon = 0.01);
        // Midpoint should be ~0.5 (linear interpolation)
        assert_abs_diff_eq!(result[1], 0.5, epsilon = 0.1);
    }

    #[test]
    fn resample_downsample_halves_length() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let result = resample_linear(&samples, 32000.0, 16000.0);
        assert_eq!(result.len(), 50);
    }

    #[test]
    fn i16_conversion_round_values() {
        let pcm = to_i16_pcm(&[0.0, 1.0, -1.0]);
        assert_eq!(pcm.len(), 6);

        assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), 0);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), i16::MAX);
        // -1.0 → -32767 (not -32768 due to clamping math)
        assert_eq!(i16::from_le_bytes([pcm[4], pcm[5]]), -i16::MAX);
    }

    #[test]
    fn i16_conversion_clamps_out_of_range() {
        let pcm = to_i16_pcm(&[2.0, -3.0]);
        assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), -i16::MAX);
    }

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms_level(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(rms_level(&[]), 0.0);
    }

    #[test]
    fn amplitude_level_full_scale() {
        assert_eq!(amplitude_level(&[1.0, 1.0, 1.0]), 100);
        assert_eq!(amplitude_level(&[0.0, 0.0]), 0);
    }

    #[test]
    fn amplitude_level_midrange() {
        let level = amplitude_level(&[0.5, -0.5, 0.5, -0.5]);
        assert_eq!(level, 50);
    }
}
