//! The audio buffer type shared by every transform.
//!
//! An [`AudioSignal`] holds deinterleaved f32 sample data plus the metadata
//! that matters for playback correctness (sample rate, channel count). Its
//! [`content_hash`](AudioSignal::content_hash) is the fingerprint the
//! regression harness compares against golden records, so the byte encoding
//! fed to BLAKE3 is canonical: it covers sample rate, channel count, frame
//! count, and every sample in little-endian order, and nothing else.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{SignalError, SignalResult};

/// Loudness floor in dBFS reported for silent signals.
const SILENCE_FLOOR_DB: f64 = -70.0;

/// An immutable-by-convention audio buffer.
///
/// Transforms never mutate a signal in place; they derive a new one via
/// [`derive`](AudioSignal::derive), which carries the metadata over and
/// resets the loudness cache.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    /// Deinterleaved sample data, one `Vec<f32>` per channel.
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    sample_rate: u32,
    /// Path this signal was loaded from, if any.
    source: Option<PathBuf>,
    /// Offset in seconds used at load time, if any.
    offset: Option<f64>,
    /// Duration in seconds requested at load time, if any.
    duration: Option<f64>,
    /// Lazily computed RMS loudness in dBFS. Not part of equality or the
    /// content hash.
    loudness: OnceLock<f64>,
}

impl PartialEq for AudioSignal {
    fn eq(&self, other: &Self) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }
}

impl AudioSignal {
    /// Builds a signal from deinterleaved channel buffers.
    ///
    /// Fails on an empty buffer or channels of unequal length.
    pub fn from_samples(channels: Vec<Vec<f32>>, sample_rate: u32) -> SignalResult<Self> {
        if channels.is_empty() || channels[0].is_empty() {
            return Err(SignalError::Empty);
        }
        let first_len = channels[0].len();
        if channels.iter().any(|c| c.len() != first_len) {
            return Err(SignalError::RaggedChannels {
                lengths: channels.iter().map(Vec::len).collect(),
            });
        }
        Ok(Self {
            channels,
            sample_rate,
            source: None,
            offset: None,
            duration: None,
            loudness: OnceLock::new(),
        })
    }

    /// Loads a full WAV file.
    pub fn load(path: impl AsRef<Path>) -> SignalResult<Self> {
        Self::load_range(path, 0.0, None)
    }

    /// Loads a WAV file starting `offset` seconds in, reading at most
    /// `duration` seconds.
    ///
    /// Both bounds are clamped to the file's length; an offset at or past
    /// the end of the file is an error. Integer WAVs of any bit depth and
    /// 32-bit float WAVs are normalized to f32.
    pub fn load_range(
        path: impl AsRef<Path>,
        offset: f64,
        duration: Option<f64>,
    ) -> SignalResult<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path).map_err(|e| SignalError::wav(path, e))?;
        let spec = reader.spec();
        let num_channels = spec.channels as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .collect::<Result<Vec<i32>, _>>()
                    .map_err(|e| SignalError::wav(path, e))?
                    .into_iter()
                    .map(|s| s as f32 / max_val)
                    .collect()
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| SignalError::wav(path, e))?,
        };

        let total_frames = interleaved.len() / num_channels;
        let available = total_frames as f64 / spec.sample_rate as f64;

        let start_frame = (offset * spec.sample_rate as f64).round() as usize;
        if start_frame >= total_frames {
            return Err(SignalError::OffsetPastEnd {
                path: path.to_path_buf(),
                offset,
                available,
            });
        }
        let end_frame = match duration {
            Some(d) => {
                let frames = (d * spec.sample_rate as f64).round() as usize;
                (start_frame + frames).min(total_frames)
            }
            None => total_frames,
        };

        let mut channels = vec![Vec::with_capacity(end_frame - start_frame); num_channels];
        for frame in start_frame..end_frame {
            for (ch, buf) in channels.iter_mut().enumerate() {
                buf.push(interleaved[frame * num_channels + ch]);
            }
        }

        let mut signal = Self::from_samples(channels, spec.sample_rate)?;
        signal.source = Some(path.to_path_buf());
        signal.offset = (offset > 0.0).then_some(offset);
        signal.duration = duration;
        Ok(signal)
    }

    /// Derives a new signal with replacement sample data.
    ///
    /// Sample rate and source metadata carry over; the loudness cache does
    /// not. This is how transforms produce their output without touching
    /// the input buffer.
    pub fn derive(&self, channels: Vec<Vec<f32>>) -> SignalResult<Self> {
        let mut derived = Self::from_samples(channels, self.sample_rate)?;
        derived.source = self.source.clone();
        derived.offset = self.offset;
        derived.duration = self.duration;
        Ok(derived)
    }

    /// Deinterleaved sample data, one buffer per channel.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Path this signal was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// RMS loudness in dBFS over all channels, cached after first call.
    ///
    /// Silence reports the fixed floor of -70 dB rather than -inf.
    pub fn loudness(&self) -> f64 {
        *self.loudness.get_or_init(|| {
            let num_samples: usize = self.channels.iter().map(Vec::len).sum();
            let sum_sq: f64 = self
                .channels
                .iter()
                .flat_map(|c| c.iter())
                .map(|&s| s as f64 * s as f64)
                .sum();
            let rms = (sum_sq / num_samples as f64).sqrt();
            if rms <= 0.0 {
                SILENCE_FLOOR_DB
            } else {
                (20.0 * rms.log10()).max(SILENCE_FLOOR_DB)
            }
        })
    }

    /// Canonical BLAKE3 content hash as a 64-char lowercase hex string.
    ///
    /// Covers sample rate, channel count, frame count, and every sample as
    /// little-endian f32 bytes. Two signals with identical buffers and
    /// metadata hash identically regardless of process or machine.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.sample_rate.to_le_bytes());
        hasher.update(&(self.num_channels() as u32).to_le_bytes());
        hasher.update(&(self.num_frames() as u64).to_le_bytes());
        for channel in &self.channels {
            for sample in channel {
                hasher.update(&sample.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Writes the signal as a 32-bit float WAV file.
    ///
    /// f32 round-trips losslessly through this format, so a written signal
    /// loads back with an identical content hash.
    pub fn write_wav(&self, path: impl AsRef<Path>) -> SignalResult<()> {
        let path = path.as_ref();
        let spec = hound::WavSpec {
            channels: self.num_channels() as u16,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer =
            hound::WavWriter::create(path, spec).map_err(|e| SignalError::wav(path, e))?;
        for frame in 0..self.num_frames() {
            for channel in &self.channels {
                writer
                    .write_sample(channel[frame])
                    .map_err(|e| SignalError::wav(path, e))?;
            }
        }
        writer.finalize().map_err(|e| SignalError::wav(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ramp_signal(frames: usize, channels: usize) -> AudioSignal {
        let data = (0..channels)
            .map(|c| (0..frames).map(|i| (i + c) as f32 / frames as f32).collect())
            .collect();
        AudioSignal::from_samples(data, 8000).unwrap()
    }

    #[test]
    fn test_from_samples_rejects_empty() {
        assert!(matches!(
            AudioSignal::from_samples(vec![], 8000),
            Err(SignalError::Empty)
        ));
        assert!(matches!(
            AudioSignal::from_samples(vec![vec![]], 8000),
            Err(SignalError::Empty)
        ));
    }

    #[test]
    fn test_from_samples_rejects_ragged() {
        let result = AudioSignal::from_samples(vec![vec![0.0; 4], vec![0.0; 3]], 8000);
        assert!(matches!(result, Err(SignalError::RaggedChannels { .. })));
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() {
        let a = ramp_signal(64, 2);
        let b = ramp_signal(64, 2);
        assert_eq!(a.content_hash(), b.content_hash());

        // Any sample change alters the hash
        let mut data: Vec<Vec<f32>> = a.channels().to_vec();
        data[1][10] += 0.25;
        let c = a.derive(data).unwrap();
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_hash_covers_metadata() {
        let a = ramp_signal(64, 1);
        let b = AudioSignal::from_samples(a.channels().to_vec(), 16000).unwrap();
        assert_ne!(a.content_hash(), b.content_hash());

        // Same flat sample content split differently across channels
        let mono = AudioSignal::from_samples(vec![vec![0.5; 8]], 8000).unwrap();
        let stereo = AudioSignal::from_samples(vec![vec![0.5; 4], vec![0.5; 4]], 8000).unwrap();
        assert_ne!(mono.content_hash(), stereo.content_hash());
    }

    #[test]
    fn test_loudness_silence_floor() {
        let silent = AudioSignal::from_samples(vec![vec![0.0; 128]], 8000).unwrap();
        assert_eq!(silent.loudness(), -70.0);
    }

    #[test]
    fn test_loudness_full_scale() {
        let full = AudioSignal::from_samples(vec![vec![1.0; 128]], 8000).unwrap();
        assert!(full.loudness().abs() < 1e-9, "full scale is 0 dBFS");
        // Cached value is returned on the second call
        assert_eq!(full.loudness(), full.loudness());
    }

    #[test]
    fn test_derive_preserves_metadata_and_resets_loudness() {
        let a = ramp_signal(64, 2);
        let _ = a.loudness();
        let halved: Vec<Vec<f32>> = a
            .channels()
            .iter()
            .map(|c| c.iter().map(|s| s * 0.5).collect())
            .collect();
        let b = a.derive(halved).unwrap();
        assert_eq!(b.sample_rate(), a.sample_rate());
        assert_eq!(b.num_channels(), a.num_channels());
        assert!(b.loudness() < a.loudness());
    }

    #[test]
    fn test_wav_round_trip_preserves_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        let signal = ramp_signal(200, 2);
        signal.write_wav(&path).unwrap();

        let loaded = AudioSignal::load(&path).unwrap();
        assert_eq!(loaded.sample_rate(), signal.sample_rate());
        assert_eq!(loaded.num_channels(), 2);
        assert_eq!(loaded.content_hash(), signal.content_hash());
        assert_eq!(loaded.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_range_offset_and_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        ramp_signal(8000, 1).write_wav(&path).unwrap();

        let slice = AudioSignal::load_range(&path, 0.25, Some(0.5)).unwrap();
        assert_eq!(slice.num_frames(), 4000);
        assert_eq!(slice.duration_seconds(), 0.5);
        // First frame of the slice is frame 2000 of the source
        assert_eq!(slice.channels()[0][0], 2000.0 / 8000.0);

        // Duration clamps to the end of the file
        let tail = AudioSignal::load_range(&path, 0.75, Some(10.0)).unwrap();
        assert_eq!(tail.num_frames(), 2000);
    }

    #[test]
    fn test_load_range_offset_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        ramp_signal(100, 1).write_wav(&path).unwrap();

        let result = AudioSignal::load_range(&path, 5.0, None);
        assert!(matches!(result, Err(SignalError::OffsetPastEnd { .. })));
    }
}
