//! Explicit registry of leaf transforms.
//!
//! Discovery is by registration, not introspection: each transform is
//! entered under its stable name, and the composite
//! [`Compose`](crate::compose::Compose) is deliberately never registered
//! because it is a container of other transforms, not a leaf.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{TransformError, TransformResult};
use crate::transform::Transform;
use crate::transforms::{
    BackgroundNoise, BackgroundNoiseConfig, FileLevelVolumeNorm, FileLevelVolumeNormConfig, Gain,
    GainConfig, Identity, RoomImpulseResponse, RoomImpulseResponseConfig, TimeShift,
    TimeShiftConfig, VolumeNorm, VolumeNormConfig,
};

/// Shared configuration handed to transform factories.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Listing files for the background-noise catalog.
    pub noise_csv_files: Vec<PathBuf>,
    /// Listing files for the impulse-response catalog.
    pub ir_csv_files: Vec<PathBuf>,
}

/// Builds one transform from the shared configuration.
pub type TransformFactory = fn(&RegistryConfig) -> TransformResult<Box<dyn Transform>>;

/// Name-keyed registry of leaf transform factories.
///
/// Backed by a `BTreeMap` so enumeration order is the sorted name order,
/// run after run.
pub struct TransformRegistry {
    factories: BTreeMap<&'static str, TransformFactory>,
}

impl TransformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The registry of all built-in leaf transforms.
    ///
    /// Compose is excluded by construction.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("BackgroundNoise", build_background_noise);
        registry.register("FileLevelVolumeNorm", build_file_level_volume_norm);
        registry.register("Gain", build_gain);
        registry.register("Identity", build_identity);
        registry.register("RoomImpulseResponse", build_room_impulse_response);
        registry.register("TimeShift", build_time_shift);
        registry.register("VolumeNorm", build_volume_norm);
        registry
    }

    /// Registers a factory under a name, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, factory: TransformFactory) {
        self.factories.insert(name, factory);
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// True if a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the transform registered under `name`.
    pub fn build(&self, name: &str, config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            TransformError::configuration(format!("no transform registered under '{}'", name))
        })?;
        factory(config)
    }

    /// Builds every registered transform in name order.
    pub fn build_all(&self, config: &RegistryConfig) -> TransformResult<Vec<Box<dyn Transform>>> {
        self.factories.values().map(|f| f(config)).collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn build_identity(_config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(Identity))
}

fn build_gain(_config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(Gain::new(GainConfig::default())?))
}

fn build_time_shift(_config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(TimeShift::new(TimeShiftConfig::default())?))
}

fn build_volume_norm(_config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(VolumeNorm::new(VolumeNormConfig::default())?))
}

fn build_file_level_volume_norm(_config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(FileLevelVolumeNorm::new(
        FileLevelVolumeNormConfig::default(),
    )?))
}

fn build_background_noise(config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(BackgroundNoise::new(BackgroundNoiseConfig {
        csv_files: config.noise_csv_files.clone(),
        ..Default::default()
    })?))
}

fn build_room_impulse_response(config: &RegistryConfig) -> TransformResult<Box<dyn Transform>> {
    Ok(Box::new(RoomImpulseResponse::new(
        RoomImpulseResponseConfig {
            csv_files: config.ir_csv_files.clone(),
        },
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_names_are_sorted_and_exclude_compose() {
        let registry = TransformRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "BackgroundNoise",
                "FileLevelVolumeNorm",
                "Gain",
                "Identity",
                "RoomImpulseResponse",
                "TimeShift",
                "VolumeNorm",
            ]
        );
        assert!(!registry.contains("Compose"));
    }

    #[test]
    fn test_build_unknown_name_fails() {
        let registry = TransformRegistry::builtin();
        let result = registry.build("Reverb", &RegistryConfig::default());
        assert!(matches!(result, Err(TransformError::Configuration { .. })));
    }

    #[test]
    fn test_catalog_backed_factories_require_listings() {
        let registry = TransformRegistry::builtin();
        let config = RegistryConfig::default();
        assert!(registry.build("BackgroundNoise", &config).is_err());
        assert!(registry.build("RoomImpulseResponse", &config).is_err());
        // Non-catalog transforms build fine without listings
        assert!(registry.build("Gain", &config).is_ok());
    }

    #[test]
    fn test_built_transform_reports_its_name() {
        let registry = TransformRegistry::builtin();
        let gain = registry.build("Gain", &RegistryConfig::default()).unwrap();
        assert_eq!(gain.name(), "Gain");
    }
}
