//! The two-phase transform contract.
//!
//! Every augmentation splits into `instantiate` (derive parameters from a
//! seed, no signal mutation) and `apply` (deterministically rewrite the
//! signal given those parameters). The split is what makes seeding
//! reproducible and testable independent of signal content, so it is the
//! one interface the whole crate hangs off.

use rand_pcg::Pcg32;

use sonaug_signal::rng::{create_rng, derive_component_seed};
use sonaug_signal::AudioSignal;

use crate::error::TransformResult;
use crate::params::{ParamBundle, SIGNAL_KEY};

/// A unit of augmentation.
///
/// Implementations must keep both phases deterministic:
///
/// - `instantiate` is a pure function of `(seed, signal metadata, catalog
///   contents)`. It must not mutate the signal and must not consult any
///   process-global random state; all draws come from
///   [`seeded_rng`](Transform::seeded_rng), which is scoped to the call.
/// - `apply` is a deterministic function of the bundle. Side effects are
///   confined to the returned signal; catalogs are never re-read here.
pub trait Transform {
    /// Stable transform name, used for registry lookup, golden records,
    /// and random-stream separation.
    fn name(&self) -> &'static str;

    /// Derives the parameter bundle for this seed and input signal.
    fn instantiate(&self, seed: u32, signal: &AudioSignal) -> TransformResult<ParamBundle>;

    /// Consumes a bundle holding the working signal under
    /// [`SIGNAL_KEY`] and returns it with the augmented signal in place.
    fn apply(&self, batch: ParamBundle) -> TransformResult<ParamBundle>;

    /// Call-scoped RNG for `instantiate`.
    ///
    /// The stream is keyed on the transform name, so sibling transforms
    /// handed the same seed never draw from the same sequence.
    fn seeded_rng(&self, seed: u32) -> Pcg32 {
        create_rng(derive_component_seed(seed, self.name()))
    }
}

/// Runs a transform end to end: instantiate, thread the signal through
/// `apply`, and extract the result.
pub fn run<T: Transform + ?Sized>(
    transform: &T,
    seed: u32,
    signal: &AudioSignal,
) -> TransformResult<AudioSignal> {
    let mut batch = transform.instantiate(seed, signal)?;
    batch.insert(SIGNAL_KEY, signal.clone());
    let mut batch = transform.apply(batch)?;
    batch.take_signal(SIGNAL_KEY)
}
