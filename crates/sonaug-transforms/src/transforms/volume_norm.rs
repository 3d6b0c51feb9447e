//! Loudness normalization transforms.
//!
//! [`VolumeNorm`] normalizes against the clip's own measured loudness.
//! [`FileLevelVolumeNorm`] normalizes against a loudness computed over the
//! whole source file, which only the caller can supply (a full-file
//! analysis is not derivable from the clip), so `apply` requires an
//! injected `file_loudness` parameter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use sonaug_signal::AudioSignal;

use crate::dsp;
use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// Bundle key the caller fills in before running
/// [`FileLevelVolumeNorm::apply`].
pub const FILE_LOUDNESS_KEY: &str = "file_loudness";

fn validate_range(name: &str, min_db: f64, max_db: f64) -> TransformResult<()> {
    if min_db > max_db {
        return Err(TransformError::configuration(format!(
            "{} range inverted: min_db {} > max_db {}",
            name, min_db, max_db
        )));
    }
    Ok(())
}

fn draw_db<R: Rng>(rng: &mut R, min_db: f64, max_db: f64) -> f64 {
    if min_db == max_db {
        min_db
    } else {
        rng.gen_range(min_db..=max_db)
    }
}

fn apply_gain_to_batch(mut batch: ParamBundle, gain_db: f64) -> TransformResult<ParamBundle> {
    let signal = batch.take_signal(SIGNAL_KEY)?;
    let output = signal.derive(dsp::scaled(signal.channels(), dsp::db_to_amplitude(gain_db)))?;
    batch.insert(SIGNAL_KEY, output);
    Ok(batch)
}

/// Configuration for [`VolumeNorm`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeNormConfig {
    /// Lower bound of the target loudness in dBFS.
    pub min_db: f64,
    /// Upper bound of the target loudness in dBFS.
    pub max_db: f64,
}

impl Default for VolumeNormConfig {
    fn default() -> Self {
        Self {
            min_db: -24.0,
            max_db: -14.0,
        }
    }
}

/// Normalizes the clip to a seed-drawn target loudness.
///
/// `instantiate` measures the input's loudness and records it alongside the
/// drawn target; `apply` only applies the resulting gain.
#[derive(Debug, Clone)]
pub struct VolumeNorm {
    config: VolumeNormConfig,
}

impl VolumeNorm {
    /// Creates a volume-norm transform, validating the range.
    pub fn new(config: VolumeNormConfig) -> TransformResult<Self> {
        validate_range("volume norm", config.min_db, config.max_db)?;
        Ok(Self { config })
    }
}

impl Transform for VolumeNorm {
    fn name(&self) -> &'static str {
        "VolumeNorm"
    }

    fn instantiate(&self, seed: u32, signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let target_db = draw_db(&mut rng, self.config.min_db, self.config.max_db);

        let mut params = ParamBundle::new();
        params.insert("target_db", target_db);
        params.insert("input_loudness", signal.loudness());
        Ok(params)
    }

    fn apply(&self, batch: ParamBundle) -> TransformResult<ParamBundle> {
        let target_db = batch.float("target_db")?;
        let input_loudness = batch.float("input_loudness")?;
        apply_gain_to_batch(batch, target_db - input_loudness)
    }
}

/// Configuration for [`FileLevelVolumeNorm`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLevelVolumeNormConfig {
    /// Lower bound of the target loudness in dBFS.
    pub min_db: f64,
    /// Upper bound of the target loudness in dBFS.
    pub max_db: f64,
}

impl Default for FileLevelVolumeNormConfig {
    fn default() -> Self {
        Self {
            min_db: -24.0,
            max_db: -24.0,
        }
    }
}

/// Normalizes against the whole source file's loudness.
///
/// The file-level loudness cannot be computed here, so the caller must
/// inject it under [`FILE_LOUDNESS_KEY`] between `instantiate` and `apply`;
/// a missing value is an error, never a silent fallback.
#[derive(Debug, Clone)]
pub struct FileLevelVolumeNorm {
    config: FileLevelVolumeNormConfig,
}

impl FileLevelVolumeNorm {
    /// Creates a file-level volume-norm transform, validating the range.
    pub fn new(config: FileLevelVolumeNormConfig) -> TransformResult<Self> {
        validate_range("file-level volume norm", config.min_db, config.max_db)?;
        Ok(Self { config })
    }
}

impl Transform for FileLevelVolumeNorm {
    fn name(&self) -> &'static str {
        "FileLevelVolumeNorm"
    }

    fn instantiate(&self, seed: u32, _signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let target_db = draw_db(&mut rng, self.config.min_db, self.config.max_db);

        let mut params = ParamBundle::new();
        params.insert("target_db", target_db);
        Ok(params)
    }

    fn apply(&self, batch: ParamBundle) -> TransformResult<ParamBundle> {
        let target_db = batch.float("target_db")?;
        let file_loudness = batch.float(FILE_LOUDNESS_KEY)?;
        apply_gain_to_batch(batch, target_db - file_loudness)
    }
}
