//! Determinism properties of the transform pipeline.
//!
//! The invariant under test: `instantiate` is a pure function of
//! `(seed, signal, catalog)` and the full instantiate/apply/hash pipeline
//! replays identically. Divergence here is a defect even though no runtime
//! error is raised for it.

use std::sync::OnceLock;

use proptest::prelude::*;

use sonaug_signal::rng::derive_child_seed;
use sonaug_transforms::{
    run, Compose, Gain, GainConfig, TimeShift, TimeShiftConfig, Transform, TransformRegistry,
    FILE_LOUDNESS_KEY, SIGNAL_KEY,
};
use sonaug_tests::AudioFixture;

fn fixture() -> &'static AudioFixture {
    static FIXTURE: OnceLock<AudioFixture> = OnceLock::new();
    FIXTURE.get_or_init(AudioFixture::new)
}

/// Runs one transform end to end, injecting the file-level loudness where
/// required, and returns the output hash.
fn pipeline_hash(transform: &dyn Transform, seed: u32) -> String {
    let signal = fixture().clip();
    let mut batch = transform.instantiate(seed, &signal).expect("instantiate");
    if transform.name() == "FileLevelVolumeNorm" {
        batch.insert(FILE_LOUDNESS_KEY, signal.loudness());
    }
    batch.insert(SIGNAL_KEY, signal);
    let mut batch = transform.apply(batch).expect("apply");
    batch.take_signal(SIGNAL_KEY).expect("signal").content_hash()
}

#[test]
fn instantiate_twice_yields_identical_params() {
    let fixture = fixture();
    let signal = fixture.clip();
    let registry = TransformRegistry::builtin();
    let config = fixture.registry_config();

    for name in registry.names() {
        let transform = registry.build(name, &config).expect(name);
        for seed in [0u32, 1, 42, 7919] {
            let first = transform.instantiate(seed, &signal).expect(name);
            let second = transform.instantiate(seed, &signal).expect(name);
            assert_eq!(first, second, "{} diverged at seed {}", name, seed);
        }
    }
}

#[test]
fn instantiate_never_mutates_the_input() {
    let fixture = fixture();
    let signal = fixture.clip();
    let registry = TransformRegistry::builtin();
    let config = fixture.registry_config();

    let hash_before = signal.content_hash();
    for name in registry.names() {
        let transform = registry.build(name, &config).expect(name);
        let _ = transform.instantiate(0, &signal).expect(name);
        assert_eq!(signal.content_hash(), hash_before, "{}", name);
    }
}

#[test]
fn pipeline_hash_is_stable_across_runs() {
    let fixture = fixture();
    let registry = TransformRegistry::builtin();
    let config = fixture.registry_config();

    for name in registry.names() {
        let transform = registry.build(name, &config).expect(name);
        let reference = pipeline_hash(transform.as_ref(), 0);
        // Repeated runs and freshly built instances reproduce the hash
        for _ in 0..2 {
            assert_eq!(pipeline_hash(transform.as_ref(), 0), reference, "{}", name);
        }
        let rebuilt = registry.build(name, &config).expect(name);
        assert_eq!(pipeline_hash(rebuilt.as_ref(), 0), reference, "{}", name);
    }
}

#[test]
fn different_seeds_change_random_transform_output() {
    let gain = Gain::new(GainConfig::default()).unwrap();
    let signal = fixture().clip();

    let a = run(&gain, 0, &signal).unwrap().content_hash();
    let b = run(&gain, 1, &signal).unwrap().content_hash();
    assert_ne!(a, b);
}

#[test]
fn compose_equals_sequential_with_same_sub_seeds() {
    let signal = fixture().clip();
    let seed = 5u32;

    let compose = Compose::new(vec![
        Box::new(Gain::new(GainConfig::default()).unwrap()) as Box<dyn Transform>,
        Box::new(TimeShift::new(TimeShiftConfig::default()).unwrap()),
    ])
    .unwrap();
    let composed = run(&compose, seed, &signal).unwrap();

    let gain = Gain::new(GainConfig::default()).unwrap();
    let shift = TimeShift::new(TimeShiftConfig::default()).unwrap();
    let after_gain = run(&gain, derive_child_seed(seed, 0), &signal).unwrap();
    let sequential = run(&shift, derive_child_seed(seed, 1), &after_gain).unwrap();

    assert_eq!(composed.content_hash(), sequential.content_hash());
}

#[test]
fn catalog_selection_is_a_fixed_function_of_the_seed() {
    let fixture = fixture();
    let signal = fixture.clip();
    let registry = TransformRegistry::builtin();
    let config = fixture.registry_config();

    let noise = registry.build("BackgroundNoise", &config).unwrap();
    let reference = noise
        .instantiate(0, &signal)
        .unwrap()
        .int("selected_row")
        .unwrap();

    for _ in 0..5 {
        let row = noise
            .instantiate(0, &signal)
            .unwrap()
            .int("selected_row")
            .unwrap();
        assert_eq!(row, reference);
    }

    // A separately constructed instance over the same catalog agrees
    let rebuilt = registry.build("BackgroundNoise", &config).unwrap();
    let row = rebuilt
        .instantiate(0, &signal)
        .unwrap()
        .int("selected_row")
        .unwrap();
    assert_eq!(row, reference);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Gain instantiation is deterministic and in range for arbitrary seeds.
    #[test]
    fn gain_instantiate_deterministic_for_any_seed(seed in any::<u32>()) {
        let gain = Gain::new(GainConfig::default()).unwrap();
        let signal = fixture().clip();

        let first = gain.instantiate(seed, &signal).unwrap();
        let second = gain.instantiate(seed, &signal).unwrap();
        prop_assert_eq!(&first, &second);

        let db = first.float("gain_db").unwrap();
        prop_assert!((-12.0..=0.0).contains(&db));
    }

    /// Time-shift draws depend only on seed and frame count.
    #[test]
    fn time_shift_params_ignore_sample_values(seed in any::<u32>()) {
        let shift = TimeShift::new(TimeShiftConfig::default()).unwrap();
        let quiet = sonaug_signal::AudioSignal::from_samples(vec![vec![0.01; 64]], 8000).unwrap();
        let loud = sonaug_signal::AudioSignal::from_samples(vec![vec![0.9; 64]], 8000).unwrap();

        prop_assert_eq!(
            shift.instantiate(seed, &quiet).unwrap(),
            shift.instantiate(seed, &loud).unwrap()
        );
    }

    /// Compose sub-seeds differ by position for virtually every seed.
    #[test]
    fn compose_sub_seeds_differ_by_position(seed in any::<u32>()) {
        prop_assert_ne!(derive_child_seed(seed, 0), derive_child_seed(seed, 1));
    }
}
