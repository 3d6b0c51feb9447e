//! Pass-through transform.

use sonaug_signal::AudioSignal;

use crate::error::TransformResult;
use crate::params::ParamBundle;
use crate::transform::Transform;

/// Leaves the signal untouched. Useful as a chain placeholder and as the
/// simplest regression baseline.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Transform for Identity {
    fn name(&self) -> &'static str {
        "Identity"
    }

    fn instantiate(&self, _seed: u32, _signal: &AudioSignal) -> TransformResult<ParamBundle> {
        Ok(ParamBundle::new())
    }

    fn apply(&self, batch: ParamBundle) -> TransformResult<ParamBundle> {
        Ok(batch)
    }
}
