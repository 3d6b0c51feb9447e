//! Ordered chains of transforms.

use sonaug_signal::rng::derive_child_seed;
use sonaug_signal::AudioSignal;

use crate::error::{TransformError, TransformResult};
use crate::params::{ParamBundle, SIGNAL_KEY};
use crate::transform::Transform;

/// A transform holding an ordered sequence of child transforms.
///
/// `instantiate` gives child *i* the sub-seed
/// `derive_child_seed(seed, i)` - a function of `(seed, position)` only,
/// never of signal values - and nests each child's params under the key
/// `"{i}.{child_name}"`. `apply` threads the signal through the children in
/// order; the overall output is the last child's.
///
/// Compose is a container, not a leaf: it is deliberately absent from
/// [`TransformRegistry::builtin`](crate::registry::TransformRegistry::builtin).
pub struct Compose {
    children: Vec<Box<dyn Transform>>,
}

impl Compose {
    /// Creates a chain. An empty child list is a configuration error.
    pub fn new(children: Vec<Box<dyn Transform>>) -> TransformResult<Self> {
        if children.is_empty() {
            return Err(TransformError::configuration(
                "Compose requires at least one child transform",
            ));
        }
        Ok(Self { children })
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Always false; construction rejects empty chains.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn child_key(&self, index: usize) -> String {
        format!("{}.{}", index, self.children[index].name())
    }
}

impl Transform for Compose {
    fn name(&self) -> &'static str {
        "Compose"
    }

    fn instantiate(&self, seed: u32, signal: &AudioSignal) -> TransformResult<ParamBundle> {
        let mut params = ParamBundle::new();
        for (index, child) in self.children.iter().enumerate() {
            let child_seed = derive_child_seed(seed, index as u32);
            let child_params = child.instantiate(child_seed, signal)?;
            params.insert(self.child_key(index), child_params);
        }
        Ok(params)
    }

    fn apply(&self, mut batch: ParamBundle) -> TransformResult<ParamBundle> {
        let mut signal = batch.take_signal(SIGNAL_KEY)?;
        for (index, child) in self.children.iter().enumerate() {
            let key = self.child_key(index);
            let mut child_batch = batch.take_bundle(&key)?;
            child_batch.insert(SIGNAL_KEY, signal);
            let mut child_batch = child.apply(child_batch)?;
            signal = child_batch.take_signal(SIGNAL_KEY)?;
            batch.insert(key, child_batch);
        }
        batch.insert(SIGNAL_KEY, signal);
        Ok(batch)
    }
}
