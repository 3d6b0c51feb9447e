//! sonaug transform layer
//!
//! Seeded, reproducible audio augmentation built on a two-phase contract:
//!
//! - [`Transform::instantiate`] derives a [`ParamBundle`] from `(seed,
//!   signal)` - pure, no signal mutation, call-scoped RNG
//! - [`Transform::apply`] deterministically rewrites the signal given that
//!   bundle
//!
//! [`Compose`] chains transforms with BLAKE3-derived per-child sub-seeds.
//! Catalog-backed transforms ([`BackgroundNoise`],
//! [`RoomImpulseResponse`]) select assets from CSV [`Catalog`]s during
//! instantiation only. [`TransformRegistry`] is the explicit enumeration
//! surface for leaf transforms.
//!
//! # Determinism
//!
//! Given the same seed, input signal, and catalog contents, every
//! instantiate/apply pair replays identically across runs, processes, and
//! machines. No process-global random state, wall clock, or unordered
//! container iteration is involved anywhere.

pub mod catalog;
pub mod compose;
pub mod dsp;
pub mod error;
pub mod params;
pub mod registry;
pub mod transform;
pub mod transforms;

pub use catalog::{Catalog, CatalogRow};
pub use compose::Compose;
pub use error::{TransformError, TransformResult};
pub use params::{ParamBundle, ParamValue, SIGNAL_KEY};
pub use registry::{RegistryConfig, TransformFactory, TransformRegistry};
pub use transform::{run, Transform};
pub use transforms::{
    BackgroundNoise, BackgroundNoiseConfig, FileLevelVolumeNorm, FileLevelVolumeNormConfig, Gain,
    GainConfig, Identity, RoomImpulseResponse, RoomImpulseResponseConfig, TimeShift,
    TimeShiftConfig, VolumeNorm, VolumeNormConfig, FILE_LOUDNESS_KEY,
};
