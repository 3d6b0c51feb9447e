//! Random gain transform.

use rand::Rng;
use serde::{Deserialize, Serialize};

use sonaug_signal::AudioSignal;

use crate::dsp;
use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// Configuration for [`Gain`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    /// Lower bound of the drawn gain in dB.
    pub min_db: f64,
    /// Upper bound of the drawn gain in dB.
    pub max_db: f64,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            min_db: -12.0,
            max_db: 0.0,
        }
    }
}

/// Scales the signal by a gain drawn uniformly from a dB range.
#[derive(Debug, Clone)]
pub struct Gain {
    config: GainConfig,
}

impl Gain {
    /// Creates a gain transform, validating the range.
    pub fn new(config: GainConfig) -> TransformResult<Self> {
        if config.min_db > config.max_db {
            return Err(TransformError::configuration(format!(
                "gain range inverted: min_db {} > max_db {}",
                config.min_db, config.max_db
            )));
        }
        Ok(Self { config })
    }
}

impl Transform for Gain {
    fn name(&self) -> &'static str {
        "Gain"
    }

    fn instantiate(&self, seed: u32, _signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let gain_db = if self.config.min_db == self.config.max_db {
            self.config.min_db
        } else {
            rng.gen_range(self.config.min_db..=self.config.max_db)
        };
        let mut params = ParamBundle::new();
        params.insert("gain_db", gain_db);
        Ok(params)
    }

    fn apply(&self, mut batch: ParamBundle) -> TransformResult<ParamBundle> {
        let gain_db = batch.float("gain_db")?;
        let signal = batch.take_signal(SIGNAL_KEY)?;
        let output = signal.derive(dsp::scaled(signal.channels(), dsp::db_to_amplitude(gain_db)))?;
        batch.insert(SIGNAL_KEY, output);
        Ok(batch)
    }
}
