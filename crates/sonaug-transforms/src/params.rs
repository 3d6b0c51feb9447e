//! Parameter bundles produced by `instantiate` and consumed by `apply`.
//!
//! A [`ParamBundle`] is an ordered string-keyed map. The ordering matters:
//! the determinism contract forbids iteration over unordered containers, so
//! the backing store is a `BTreeMap` and two bundles built from the same
//! draws compare structurally equal.

use std::collections::BTreeMap;

use sonaug_signal::AudioSignal;

use crate::error::{TransformError, TransformResult};

/// Reserved bundle key carrying the working signal between transforms.
pub const SIGNAL_KEY: &str = "signal";

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Floating-point scalar (gains, SNRs, loudness values).
    Float(f64),
    /// Integer scalar (frame shifts, selected catalog rows).
    Int(i64),
    /// Boolean flag.
    Bool(bool),
    /// String value (resolved asset paths).
    Str(String),
    /// An audio signal, usually under [`SIGNAL_KEY`].
    Signal(AudioSignal),
    /// A nested bundle (per-child params of a composite transform).
    Bundle(ParamBundle),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<AudioSignal> for ParamValue {
    fn from(v: AudioSignal) -> Self {
        Self::Signal(v)
    }
}

impl From<ParamBundle> for ParamValue {
    fn from(v: ParamBundle) -> Self {
        Self::Bundle(v)
    }
}

/// Ordered mapping from parameter names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamBundle {
    entries: BTreeMap<String, ParamValue>,
}

impl ParamBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous entry under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// True if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.entries.iter()
    }

    /// Reads a float parameter.
    pub fn float(&self, key: &str) -> TransformResult<f64> {
        match self.entries.get(key) {
            Some(ParamValue::Float(v)) => Ok(*v),
            Some(_) => Err(TransformError::WrongParamType {
                key: key.to_string(),
                expected: "float",
            }),
            None => Err(TransformError::missing_param(key)),
        }
    }

    /// Reads an integer parameter.
    pub fn int(&self, key: &str) -> TransformResult<i64> {
        match self.entries.get(key) {
            Some(ParamValue::Int(v)) => Ok(*v),
            Some(_) => Err(TransformError::WrongParamType {
                key: key.to_string(),
                expected: "int",
            }),
            None => Err(TransformError::missing_param(key)),
        }
    }

    /// Reads a string parameter.
    pub fn str_value(&self, key: &str) -> TransformResult<&str> {
        match self.entries.get(key) {
            Some(ParamValue::Str(v)) => Ok(v.as_str()),
            Some(_) => Err(TransformError::WrongParamType {
                key: key.to_string(),
                expected: "string",
            }),
            None => Err(TransformError::missing_param(key)),
        }
    }

    /// Borrows a signal parameter.
    pub fn signal(&self, key: &str) -> TransformResult<&AudioSignal> {
        match self.entries.get(key) {
            Some(ParamValue::Signal(v)) => Ok(v),
            Some(_) => Err(TransformError::WrongParamType {
                key: key.to_string(),
                expected: "signal",
            }),
            None => Err(TransformError::missing_param(key)),
        }
    }

    /// Removes and returns a signal parameter.
    pub fn take_signal(&mut self, key: &str) -> TransformResult<AudioSignal> {
        match self.entries.remove(key) {
            Some(ParamValue::Signal(v)) => Ok(v),
            Some(other) => {
                // Put it back so the bundle is unchanged on error
                self.entries.insert(key.to_string(), other);
                Err(TransformError::WrongParamType {
                    key: key.to_string(),
                    expected: "signal",
                })
            }
            None => Err(TransformError::missing_param(key)),
        }
    }

    /// Removes and returns a nested bundle.
    pub fn take_bundle(&mut self, key: &str) -> TransformResult<ParamBundle> {
        match self.entries.remove(key) {
            Some(ParamValue::Bundle(v)) => Ok(v),
            Some(other) => {
                self.entries.insert(key.to_string(), other);
                Err(TransformError::WrongParamType {
                    key: key.to_string(),
                    expected: "bundle",
                })
            }
            None => Err(TransformError::missing_param(key)),
        }
    }
}
