//! Impulse-response convolution transform, backed by an IR catalog.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sonaug_signal::AudioSignal;

use crate::catalog::Catalog;
use crate::dsp;
use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// Configuration for [`RoomImpulseResponse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomImpulseResponseConfig {
    /// CSV listing files referencing impulse-response recordings. Required.
    pub csv_files: Vec<PathBuf>,
}

/// Convolves the signal with a catalog impulse response.
///
/// The IR's first channel is peak-normalized before convolution; the
/// output is truncated to the input length and rescaled to the input's
/// peak, so level stays comparable across IRs.
#[derive(Debug, Clone)]
pub struct RoomImpulseResponse {
    catalog: Catalog,
}

impl RoomImpulseResponse {
    /// Creates the transform, loading and validating the catalog.
    pub fn new(config: RoomImpulseResponseConfig) -> TransformResult<Self> {
        if config.csv_files.is_empty() {
            return Err(TransformError::configuration(
                "RoomImpulseResponse requires at least one catalog listing file",
            ));
        }
        let catalog = Catalog::from_files(&config.csv_files)?;
        Ok(Self { catalog })
    }

    /// The loaded impulse-response catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Transform for RoomImpulseResponse {
    fn name(&self) -> &'static str {
        "RoomImpulseResponse"
    }

    fn instantiate(&self, seed: u32, _signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut rng = self.seeded_rng(seed);
        let (row_index, row) = self.catalog.select(&mut rng);

        let mut params = ParamBundle::new();
        params.insert("selected_row", row_index as i64);
        params.insert("ir_path", row.path.to_string_lossy().to_string());
        Ok(params)
    }

    fn apply(&self, mut batch: ParamBundle) -> TransformResult<ParamBundle> {
        let ir_path = batch.str_value("ir_path")?.to_string();
        let signal = batch.take_signal(SIGNAL_KEY)?;

        let ir = AudioSignal::load(&ir_path)?;
        if ir.sample_rate() != signal.sample_rate() {
            return Err(TransformError::configuration(format!(
                "impulse response sample rate {} does not match signal sample rate {} ({})",
                ir.sample_rate(),
                signal.sample_rate(),
                ir_path
            )));
        }

        let ir_peak = dsp::peak(&ir.channels()[..1]);
        if ir_peak <= 0.0 {
            return Err(TransformError::configuration(format!(
                "impulse response is silent: {}",
                ir_path
            )));
        }
        let kernel: Vec<f32> = ir.channels()[0].iter().map(|s| s / ir_peak).collect();

        let frames = signal.num_frames();
        let input_peak = dsp::peak(signal.channels());
        let mut convolved: Vec<Vec<f32>> = signal
            .channels()
            .iter()
            .map(|channel| {
                let mut out = dsp::convolve(channel, &kernel);
                out.truncate(frames);
                out
            })
            .collect();

        // Restore the input's peak level after convolution
        let out_peak = dsp::peak(&convolved);
        if out_peak > 0.0 && input_peak > 0.0 {
            let gain = (input_peak / out_peak) as f64;
            convolved = dsp::scaled(&convolved, gain);
        }

        batch.insert(SIGNAL_KEY, signal.derive(convolved)?);
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::run;
    use std::fs;
    use std::path::Path;

    fn fixture(dir: &Path) -> RoomImpulseResponseConfig {
        // A unit-impulse IR: convolution with it is the identity
        let unit = dir.join("unit.wav");
        let mut kernel = vec![0.0f32; 8];
        kernel[0] = 1.0;
        AudioSignal::from_samples(vec![kernel], 8000)
            .unwrap()
            .write_wav(&unit)
            .unwrap();

        let csv = dir.join("irs.csv");
        fs::write(&csv, "path\nunit.wav\n").unwrap();
        RoomImpulseResponseConfig {
            csv_files: vec![csv],
        }
    }

    #[test]
    fn test_requires_catalog_files() {
        let result = RoomImpulseResponse::new(RoomImpulseResponseConfig::default());
        assert!(matches!(result, Err(TransformError::Configuration { .. })));
    }

    #[test]
    fn test_unit_impulse_preserves_signal() {
        let dir = tempfile::tempdir().unwrap();
        let rir = RoomImpulseResponse::new(fixture(dir.path())).unwrap();

        let signal = AudioSignal::from_samples(vec![vec![0.5, -0.25, 0.125, 0.0]], 8000).unwrap();
        let out = run(&rir, 0, &signal).unwrap();

        assert_eq!(out.num_frames(), signal.num_frames());
        for (a, b) in out.channels()[0].iter().zip(signal.channels()[0].iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_silent_ir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let silent = dir.path().join("silent.wav");
        AudioSignal::from_samples(vec![vec![0.0; 8]], 8000)
            .unwrap()
            .write_wav(&silent)
            .unwrap();
        let csv = dir.path().join("irs.csv");
        fs::write(&csv, "path\nsilent.wav\n").unwrap();

        let rir = RoomImpulseResponse::new(RoomImpulseResponseConfig {
            csv_files: vec![csv],
        })
        .unwrap();
        let signal = AudioSignal::from_samples(vec![vec![0.5; 16]], 8000).unwrap();
        assert!(matches!(
            run(&rir, 0, &signal),
            Err(TransformError::Configuration { .. })
        ));
    }

    #[test]
    fn test_instantiate_records_selected_row() {
        let dir = tempfile::tempdir().unwrap();
        let rir = RoomImpulseResponse::new(fixture(dir.path())).unwrap();
        let signal = AudioSignal::from_samples(vec![vec![0.5; 16]], 8000).unwrap();

        let params = rir.instantiate(9, &signal).unwrap();
        assert_eq!(params.int("selected_row").unwrap(), 0);
        assert!(params.str_value("ir_path").unwrap().ends_with("unit.wav"));
    }
}
