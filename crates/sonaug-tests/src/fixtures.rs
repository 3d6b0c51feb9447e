//! Synthetic audio fixtures for harness tests.
//!
//! Real recordings would bloat the repository, so the fixture tree is
//! synthesized: a seeded voice-like clip, two noise beds, and two decaying
//! impulse responses, all written as 32-bit float WAVs (lossless through
//! load, so fixture hashes are stable) plus the CSV listings the
//! catalog-backed transforms need.

use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tempfile::TempDir;

use sonaug_signal::rng::create_rng;
use sonaug_signal::AudioSignal;
use sonaug_transforms::RegistryConfig;

/// Fixture sample rate. Kept low so direct convolution stays fast.
pub const FIXTURE_SAMPLE_RATE: u32 = 8000;

/// A temporary tree of fixture audio and catalog listings.
pub struct AudioFixture {
    root: TempDir,
    /// The clip every transform is exercised against.
    pub clip_path: PathBuf,
    /// Listing file for the noise catalog.
    pub noises_csv: PathBuf,
    /// Listing file for the impulse-response catalog.
    pub irs_csv: PathBuf,
}

impl AudioFixture {
    /// Builds the fixture tree.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create fixture dir");
        let dir = root.path();

        let clip_path = dir.join("clip.wav");
        synth_clip(7, 1.0)
            .write_wav(&clip_path)
            .expect("Failed to write fixture clip");

        let noise_a = dir.join("noise_hum.wav");
        let noise_b = dir.join("noise_hiss.wav");
        synth_noise(11, 1.2).write_wav(&noise_a).unwrap();
        synth_noise(13, 0.8).write_wav(&noise_b).unwrap();
        let noises_csv = dir.join("noises.csv");
        fs::write(&noises_csv, "path\nnoise_hum.wav\nnoise_hiss.wav\n")
            .expect("Failed to write noises.csv");

        let ir_a = dir.join("ir_small.wav");
        let ir_b = dir.join("ir_large.wav");
        synth_impulse_response(17, 0.05).write_wav(&ir_a).unwrap();
        synth_impulse_response(19, 0.12).write_wav(&ir_b).unwrap();
        let irs_csv = dir.join("irs.csv");
        fs::write(&irs_csv, "path\nir_small.wav\nir_large.wav\n")
            .expect("Failed to write irs.csv");

        Self {
            root,
            clip_path,
            noises_csv,
            irs_csv,
        }
    }

    /// The fixture root directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Loads the fixture clip.
    pub fn clip(&self) -> AudioSignal {
        AudioSignal::load(&self.clip_path).expect("Failed to load fixture clip")
    }

    /// Registry configuration pointing at the fixture catalogs.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            noise_csv_files: vec![self.noises_csv.clone()],
            ir_csv_files: vec![self.irs_csv.clone()],
        }
    }
}

impl Default for AudioFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A voice-like clip: a slow sine sweep with a little seeded noise on top.
fn synth_clip(seed: u32, duration: f64) -> AudioSignal {
    let frames = (duration * FIXTURE_SAMPLE_RATE as f64) as usize;
    let mut rng = create_rng(seed);
    let mut samples = Vec::with_capacity(frames);
    for i in 0..frames {
        let t = i as f64 / FIXTURE_SAMPLE_RATE as f64;
        let freq = 200.0 + 600.0 * t / duration;
        let tone = (TAU * freq * t).sin() * 0.4;
        let noise = (rng.gen::<f64>() - 0.5) * 0.05;
        samples.push((tone + noise) as f32);
    }
    AudioSignal::from_samples(vec![samples], FIXTURE_SAMPLE_RATE)
        .expect("fixture clip is non-empty")
}

/// A noise bed: seeded uniform noise at a modest level.
fn synth_noise(seed: u32, duration: f64) -> AudioSignal {
    let frames = (duration * FIXTURE_SAMPLE_RATE as f64) as usize;
    let mut rng = create_rng(seed);
    let samples = (0..frames)
        .map(|_| ((rng.gen::<f64>() - 0.5) * 0.6) as f32)
        .collect();
    AudioSignal::from_samples(vec![samples], FIXTURE_SAMPLE_RATE)
        .expect("fixture noise is non-empty")
}

/// An impulse response: a leading unit tap then exponentially decaying
/// seeded noise.
fn synth_impulse_response(seed: u32, duration: f64) -> AudioSignal {
    let frames = ((duration * FIXTURE_SAMPLE_RATE as f64) as usize).max(2);
    let mut rng = create_rng(seed);
    let mut samples = Vec::with_capacity(frames);
    samples.push(1.0f32);
    for i in 1..frames {
        let decay = (-6.0 * i as f64 / frames as f64).exp();
        samples.push(((rng.gen::<f64>() - 0.5) * decay) as f32);
    }
    AudioSignal::from_samples(vec![samples], FIXTURE_SAMPLE_RATE)
        .expect("fixture IR is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_tree_is_complete() {
        let fixture = AudioFixture::new();
        assert!(fixture.clip_path.exists());
        assert!(fixture.noises_csv.exists());
        assert!(fixture.irs_csv.exists());

        let clip = fixture.clip();
        assert_eq!(clip.sample_rate(), FIXTURE_SAMPLE_RATE);
        assert_eq!(clip.num_channels(), 1);
        assert_eq!(clip.num_frames(), FIXTURE_SAMPLE_RATE as usize);
    }

    #[test]
    fn test_fixture_clip_hash_is_stable_across_fixtures() {
        let a = AudioFixture::new();
        let b = AudioFixture::new();
        assert_eq!(a.clip().content_hash(), b.clip().content_hash());
    }
}
