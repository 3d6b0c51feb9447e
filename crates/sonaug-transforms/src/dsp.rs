//! Numeric primitives used by the transforms.
//!
//! These are the "external collaborator" numerics: small, deterministic,
//! and order-stable. Accumulation happens in f64 so results do not depend
//! on platform-specific f32 rounding of long sums.

/// Converts decibels to a linear amplitude factor.
pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Converts a linear amplitude factor to decibels.
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.log10()
}

/// RMS over all channels.
pub fn rms(channels: &[Vec<f32>]) -> f64 {
    let num_samples: usize = channels.iter().map(Vec::len).sum();
    if num_samples == 0 {
        return 0.0;
    }
    let sum_sq: f64 = channels
        .iter()
        .flat_map(|c| c.iter())
        .map(|&s| s as f64 * s as f64)
        .sum();
    (sum_sq / num_samples as f64).sqrt()
}

/// Peak absolute amplitude over all channels.
pub fn peak(channels: &[Vec<f32>]) -> f32 {
    channels
        .iter()
        .flat_map(|c| c.iter())
        .fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Scales every sample by `gain`.
pub fn scaled(channels: &[Vec<f32>], gain: f64) -> Vec<Vec<f32>> {
    channels
        .iter()
        .map(|c| c.iter().map(|&s| (s as f64 * gain) as f32).collect())
        .collect()
}

/// Rotates each channel circularly by `shift` frames.
///
/// Positive shifts move content later in time (samples wrap from the end
/// to the front).
pub fn rotated(channels: &[Vec<f32>], shift: i64) -> Vec<Vec<f32>> {
    channels
        .iter()
        .map(|c| {
            let len = c.len() as i64;
            let shift = shift.rem_euclid(len) as usize;
            let mut out = c.clone();
            out.rotate_right(shift);
            out
        })
        .collect()
}

/// Repeats `source` cyclically until `len` samples are produced.
pub fn tiled(source: &[f32], len: usize) -> Vec<f32> {
    source.iter().copied().cycle().take(len).collect()
}

/// Adds `gain * overlay` onto `base` elementwise.
///
/// Both slices must be the same length; the caller tiles or truncates
/// beforehand.
pub fn mixed(base: &[f32], overlay: &[f32], gain: f64) -> Vec<f32> {
    base.iter()
        .zip(overlay.iter())
        .map(|(&a, &b)| (a as f64 + gain * b as f64) as f32)
        .collect()
}

/// Direct convolution of `x` with kernel `h`.
///
/// Output length is `x.len() + h.len() - 1`; accumulation in f64.
pub fn convolve(x: &[f32], h: &[f32]) -> Vec<f32> {
    if x.is_empty() || h.is_empty() {
        return Vec::new();
    }
    let out_len = x.len() + h.len() - 1;
    let mut out = vec![0.0f32; out_len];
    for (n, slot) in out.iter_mut().enumerate() {
        let k_start = n.saturating_sub(x.len() - 1);
        let k_end = n.min(h.len() - 1);
        let mut acc = 0.0f64;
        for k in k_start..=k_end {
            acc += h[k] as f64 * x[n - k] as f64;
        }
        *slot = acc as f32;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_db_amplitude_round_trip() {
        assert!((db_to_amplitude(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_amplitude(-6.0206) - 0.5).abs() < 1e-4);
        assert!((amplitude_to_db(db_to_amplitude(-12.0)) + 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[vec![0.0; 8]]), 0.0);
        let r = rms(&[vec![0.5; 4], vec![0.5; 4]]);
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_wraps() {
        let data = vec![vec![1.0, 2.0, 3.0, 4.0]];
        assert_eq!(rotated(&data, 1)[0], vec![4.0, 1.0, 2.0, 3.0]);
        assert_eq!(rotated(&data, -1)[0], vec![2.0, 3.0, 4.0, 1.0]);
        assert_eq!(rotated(&data, 4)[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rotated(&data, 5)[0], rotated(&data, 1)[0]);
    }

    #[test]
    fn test_tiled() {
        assert_eq!(tiled(&[1.0, 2.0], 5), vec![1.0, 2.0, 1.0, 2.0, 1.0]);
        assert_eq!(tiled(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
    }

    #[test]
    fn test_mixed() {
        let out = mixed(&[1.0, 1.0], &[0.5, -0.5], 2.0);
        assert_eq!(out, vec![2.0, 0.0]);
    }

    #[test]
    fn test_convolve_identity_kernel() {
        let x = vec![1.0, 2.0, 3.0];
        assert_eq!(convolve(&x, &[1.0]), x);
    }

    #[test]
    fn test_convolve_known_case() {
        // [1, 2] * [1, 1] = [1, 3, 2]
        assert_eq!(convolve(&[1.0, 2.0], &[1.0, 1.0]), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[vec![0.1, -0.8], vec![0.3, 0.2]]), 0.8);
    }
}
