//! Catalogs of external audio assets, loaded from CSV listing files.
//!
//! Catalog-backed transforms load their catalog once at construction and
//! select rows during `instantiate` with the call-scoped RNG. Nothing is
//! re-read or re-selected during `apply`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{TransformError, TransformResult};

/// One catalog entry: a referenced audio asset plus any extra columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// Asset path. Relative paths are resolved against the listing file's
    /// directory.
    pub path: PathBuf,
    /// Remaining columns, keyed by header name.
    pub fields: BTreeMap<String, String>,
}

/// An ordered sequence of catalog rows.
///
/// Row order is the concatenation of the listing files in the order given,
/// each in file row order, so selection indices are stable across runs.
#[derive(Debug, Clone)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
}

impl Catalog {
    /// Loads and concatenates one or more CSV listing files.
    ///
    /// Each file needs a header line with a `path` column. An unreadable
    /// file, a missing `path` column, or zero rows overall is a
    /// configuration error.
    pub fn from_files(listings: &[PathBuf]) -> TransformResult<Self> {
        if listings.is_empty() {
            return Err(TransformError::configuration(
                "no catalog listing files given",
            ));
        }

        let mut rows = Vec::new();
        for listing in listings {
            let text = fs::read_to_string(listing).map_err(|e| {
                TransformError::configuration(format!(
                    "cannot read catalog listing {}: {}",
                    listing.display(),
                    e
                ))
            })?;
            let base_dir = listing.parent().unwrap_or_else(|| Path::new("."));
            parse_listing(&text, base_dir, listing, &mut rows)?;
        }

        if rows.is_empty() {
            return Err(TransformError::configuration(format!(
                "catalog is empty: {}",
                listings
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the catalog holds no rows. Construction rejects this state,
    /// so it only arises for hand-built catalogs in tests.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in catalog order.
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Selects a row with a uniform index draw from `rng`.
    pub fn select<R: Rng>(&self, rng: &mut R) -> (usize, &CatalogRow) {
        let index = rng.gen_range(0..self.rows.len());
        (index, &self.rows[index])
    }
}

/// Parses one listing file into `rows`.
fn parse_listing(
    text: &str,
    base_dir: &Path,
    listing: &Path,
    rows: &mut Vec<CatalogRow>,
) -> TransformResult<()> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines.next().ok_or_else(|| {
        TransformError::configuration(format!("catalog listing {} is empty", listing.display()))
    })?;
    let header = split_csv_line(header_line);
    let path_column = header.iter().position(|h| h == "path").ok_or_else(|| {
        TransformError::configuration(format!(
            "catalog listing {} has no 'path' column",
            listing.display()
        ))
    })?;

    for line in lines {
        let values = split_csv_line(line);
        let raw_path = values.get(path_column).map(String::as_str).unwrap_or("");
        if raw_path.is_empty() {
            return Err(TransformError::configuration(format!(
                "catalog listing {} has a row with an empty path",
                listing.display()
            )));
        }
        let raw = PathBuf::from(raw_path);
        let path = if raw.is_absolute() {
            raw
        } else {
            base_dir.join(raw)
        };
        let fields = header
            .iter()
            .zip(values.iter())
            .enumerate()
            .filter(|(i, _)| *i != path_column)
            .map(|(_, (k, v))| (k.clone(), v.clone()))
            .collect();
        rows.push(CatalogRow { path, fields });
    }
    Ok(())
}

/// Splits one CSV line, honoring double-quoted fields with embedded commas
/// and doubled-quote escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields.iter().map(|f| f.trim().to_string()).collect()
}
