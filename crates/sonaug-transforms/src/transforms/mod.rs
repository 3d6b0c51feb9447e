//! Leaf augmentation transforms.
//!
//! One module per transform kind. Every transform here is a leaf: it
//! carries no child transforms and is eligible for registry enumeration
//! (unlike [`Compose`](crate::compose::Compose)).

pub mod background_noise;
pub mod gain;
pub mod identity;
pub mod room_impulse;
pub mod time_shift;
pub mod volume_norm;

pub use background_noise::{BackgroundNoise, BackgroundNoiseConfig};
pub use gain::{Gain, GainConfig};
pub use identity::Identity;
pub use room_impulse::{RoomImpulseResponse, RoomImpulseResponseConfig};
pub use time_shift::{TimeShift, TimeShiftConfig};
pub use volume_norm::{
    FileLevelVolumeNorm, FileLevelVolumeNormConfig, VolumeNorm, VolumeNormConfig,
    FILE_LOUDNESS_KEY,
};
