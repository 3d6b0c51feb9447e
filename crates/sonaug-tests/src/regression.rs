//! Golden-file regression protocol.
//!
//! One JSON record per transform name, `{"hash": "<hex>"}`, under a fixed
//! data directory. The first check for a name establishes the baseline and
//! passes; later checks compare against it. Nothing in code ever rewrites
//! an existing record - regenerating a baseline means deleting the file,
//! which is an operational action.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the regression harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Computed hash disagrees with the stored baseline.
    #[error("regression mismatch for '{name}': expected {expected}, got {actual}")]
    Mismatch {
        /// Transform name whose record disagreed.
        name: String,
        /// Hash stored in the golden record.
        expected: String,
        /// Hash computed in this run.
        actual: String,
    },

    /// Golden record could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Golden record is not valid JSON of the expected shape.
    #[error("malformed golden record: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted baseline for one transform name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenRecord {
    /// Content hash of the transform's output signal.
    pub hash: String,
}

/// Outcome of a passing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No record existed; this run's hash was persisted as the baseline.
    BaselineCreated,
    /// The computed hash matched the stored baseline.
    Matched,
}

/// A directory of golden records, one file per transform name.
///
/// Checks for different names touch different files, so independent
/// workers can run them in parallel without write contention.
pub struct RegressionSuite {
    data_dir: PathBuf,
}

impl RegressionSuite {
    /// Creates a suite rooted at `data_dir`. The directory is created
    /// lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The suite's data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the record for `name`.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    /// Checks `hash` for `name` against the stored baseline.
    ///
    /// Missing record: persist the hash and pass with
    /// [`CheckOutcome::BaselineCreated`]. Existing record: pass with
    /// [`CheckOutcome::Matched`] on equality, otherwise fail with
    /// [`HarnessError::Mismatch`], leaving the record untouched.
    pub fn check(&self, name: &str, hash: &str) -> Result<CheckOutcome, HarnessError> {
        let path = self.record_path(name);
        if path.exists() {
            let record: GoldenRecord = serde_json::from_str(&fs::read_to_string(&path)?)?;
            if record.hash == hash {
                Ok(CheckOutcome::Matched)
            } else {
                Err(HarnessError::Mismatch {
                    name: name.to_string(),
                    expected: record.hash,
                    actual: hash.to_string(),
                })
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let record = GoldenRecord {
                hash: hash.to_string(),
            };
            fs::write(&path, serde_json::to_string_pretty(&record)?)?;
            Ok(CheckOutcome::BaselineCreated)
        }
    }

    /// Reads the stored record for `name`, if any.
    pub fn read_record(&self, name: &str) -> Result<Option<GoldenRecord>, HarnessError> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }
}
