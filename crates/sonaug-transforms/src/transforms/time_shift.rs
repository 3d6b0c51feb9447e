//! Circular time-shift transform.

use rand::Rng;
use serde::{Deserialize, Serialize};

use sonaug_signal::AudioSignal;

use crate::dsp;
use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// Configuration for [`TimeShift`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeShiftConfig {
    /// Largest shift as a fraction of the signal length, in `0.0..=1.0`.
    /// The drawn shift lies in `-max_fraction..=max_fraction`.
    pub max_fraction: f64,
}

impl Default for TimeShiftConfig {
    fn default() -> Self {
        Self { max_fraction: 0.5 }
    }
}

/// Rotates the signal circularly by a seed-drawn number of frames.
///
/// The shift is a function of the signal's frame count (metadata), not of
/// its sample values, so instantiation stays reproducible.
#[derive(Debug, Clone)]
pub struct TimeShift {
    config: TimeShiftConfig,
}

impl TimeShift {
    /// Creates a time-shift transform, validating the fraction.
    pub fn new(config: TimeShiftConfig) -> TransformResult<Self> {
        if !(0.0..=1.0).contains(&config.max_fraction) {
            return Err(TransformError::configuration(format!(
                "time shift max_fraction must be in 0.0..=1.0, got {}",
                config.max_fraction
            )));
        }
        Ok(Self { config })
    }
}

impl Transform for TimeShift {
    fn name(&self) -> &'static str {
        "TimeShift"
    }

    fn instantiate(&self, seed: u32, signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let fraction = if self.config.max_fraction == 0.0 {
            0.0
        } else {
            rng.gen_range(-self.config.max_fraction..=self.config.max_fraction)
        };
        let shift_frames = (fraction * signal.num_frames() as f64).round() as i64;

        let mut params = ParamBundle::new();
        params.insert("shift_fraction", fraction);
        params.insert("shift_frames", shift_frames);
        Ok(params)
    }

    fn apply(&self, mut batch: ParamBundle) -> TransformResult<ParamBundle> {
        let shift_frames = batch.int("shift_frames")?;
        let signal = batch.take_signal(SIGNAL_KEY)?;
        let output = signal.derive(dsp::rotated(signal.channels(), shift_frames))?;
        batch.insert(SIGNAL_KEY, output);
        Ok(batch)
    }
}
