//! Background-noise mixing transform, backed by a noise catalog.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};

use sonaug_signal::AudioSignal;

use crate::catalog::Catalog;
use crate::dsp;
use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// Configuration for [`BackgroundNoise`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundNoiseConfig {
    /// CSV listing files referencing noise recordings. Required.
    pub csv_files: Vec<PathBuf>,
    /// Lower bound of the drawn signal-to-noise ratio in dB.
    pub min_snr_db: f64,
    /// Upper bound of the drawn signal-to-noise ratio in dB.
    pub max_snr_db: f64,
}

impl Default for BackgroundNoiseConfig {
    fn default() -> Self {
        Self {
            csv_files: Vec::new(),
            min_snr_db: 10.0,
            max_snr_db: 30.0,
        }
    }
}

/// Mixes a catalog noise recording under the signal at a seed-drawn SNR.
///
/// The catalog is loaded once at construction; `instantiate` selects a row
/// and resolves its path into the params, so `apply` never re-reads or
/// re-selects catalog contents.
#[derive(Debug, Clone)]
pub struct BackgroundNoise {
    config: BackgroundNoiseConfig,
    catalog: Catalog,
}

impl BackgroundNoise {
    /// Creates the transform, loading and validating the catalog.
    pub fn new(config: BackgroundNoiseConfig) -> TransformResult<Self> {
        if config.csv_files.is_empty() {
            return Err(TransformError::configuration(
                "BackgroundNoise requires at least one catalog listing file",
            ));
        }
        if config.min_snr_db > config.max_snr_db {
            return Err(TransformError::configuration(format!(
                "SNR range inverted: min_snr_db {} > max_snr_db {}",
                config.min_snr_db, config.max_snr_db
            )));
        }
        let catalog = Catalog::from_files(&config.csv_files)?;
        Ok(Self { config, catalog })
    }

    /// The loaded noise catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Transform for BackgroundNoise {
    fn name(&self) -> &'static str {
        "BackgroundNoise"
    }

    fn instantiate(&self, seed: u32, _signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let (row_index, row) = self.catalog.select(&mut rng);
        let snr_db = if self.config.min_snr_db == self.config.max_snr_db {
            self.config.min_snr_db
        } else {
            rng.gen_range(self.config.min_snr_db..=self.config.max_snr_db)
        };

        let mut params = ParamBundle::new();
        params.insert("selected_row", row_index as i64);
        params.insert("noise_path", row.path.to_string_lossy().to_string());
        params.insert("snr_db", snr_db);
        Ok(params)
    }

    fn apply(&self, mut batch: ParamBundle) -> TransformResult<ParamBundle> {
        let snr_db = batch.float("snr_db")?;
        let noise_path = batch.str_value("noise_path")?.to_string();
        let signal = batch.take_signal(SIGNAL_KEY)?;

        let noise = AudioSignal::load(&noise_path)?;
        if noise.sample_rate() != signal.sample_rate() {
            return Err(TransformError::configuration(format!(
                "noise sample rate {} does not match signal sample rate {} ({})",
                noise.sample_rate(),
                signal.sample_rate(),
                noise_path
            )));
        }

        let signal_rms = dsp::rms(signal.channels());
        let noise_rms = dsp::rms(noise.channels());

        // Silent noise contributes nothing; avoid dividing by zero
        let noise_gain = if noise_rms <= 0.0 {
            0.0
        } else {
            signal_rms / (noise_rms * dsp::db_to_amplitude(snr_db))
        };

        let frames = signal.num_frames();
        let mixed = signal
            .channels()
            .iter()
            .enumerate()
            .map(|(ch, base)| {
                let noise_channel = &noise.channels()[ch % noise.num_channels()];
                dsp::mixed(base, &dsp::tiled(noise_channel, frames), noise_gain)
            })
            .collect();

        batch.insert(SIGNAL_KEY, signal.derive(mixed)?);
        Ok(batch)
    }
}
