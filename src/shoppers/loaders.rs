//! Record loaders.
//!
//! An input location may be a single file, a directory of part files (hidden
//! files and `_`-prefixed markers such as `_SUCCESS` are skipped), or a glob
//! pattern. Files are read in sorted path order. Loading stops at the first
//! malformed line: aggregates over partially loaded data would be wrong, so
//! nothing is silently dropped.

use super::records::FromFields;
use crate::{PCollection, Pipeline, RFBound, from_vec};
use anyhow::{Context, Result, bail};
use csv::StringRecord;
use glob::glob;
use log::{debug, info};
use std::fs::{File, read_dir};
use std::path::{Path, PathBuf};

/// Resolve an input location into a sorted, non-empty list of files.
///
/// # Errors
/// Returns an error if the pattern is invalid, a directory cannot be listed, or
/// nothing matches.
pub fn resolve_inputs(location: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let location = location.as_ref();
    let mut files = if location.is_file() {
        vec![location.to_path_buf()]
    } else if location.is_dir() {
        let mut out = Vec::new();
        for entry in read_dir(location).with_context(|| format!("list {}", location.display()))? {
            let path = entry
                .with_context(|| format!("read entry of {}", location.display()))?
                .path();
            let skip = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_none_or(|n| n.starts_with('.') || n.starts_with('_'));
            if path.is_file() && !skip {
                out.push(path);
            }
        }
        out
    } else {
        let pattern = location.to_string_lossy();
        let mut out = Vec::new();
        for entry in glob(&pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
            let path = entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
            if path.is_file() {
                out.push(path);
            }
        }
        out
    };

    if files.is_empty() {
        bail!("no input files found at {}", location.display());
    }
    files.sort();
    Ok(files)
}

/// Read every record from one file.
///
/// # Errors
/// Returns an error naming the file and 1-based line of the first unreadable or
/// malformed row.
pub fn read_records_file<R: FromFields>(path: &Path) -> Result<Vec<R>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(f);

    let mut out = Vec::new();
    let mut row = StringRecord::new();
    loop {
        let more = rdr
            .read_record(&mut row)
            .with_context(|| format!("read {} {}", R::KIND, path.display()))?;
        if !more {
            break;
        }
        let line = row.position().map_or(0, csv::Position::line);
        let rec = R::from_fields(&row)
            .with_context(|| format!("{}:{line}", path.display()))?;
        out.push(rec);
    }
    debug!("read {} {} records from {}", out.len(), R::KIND, path.display());
    Ok(out)
}

/// Read every record from an input location (see [`resolve_inputs`]).
///
/// # Errors
/// Fails on the first file or row that cannot be read.
pub fn read_records<R: FromFields>(location: impl AsRef<Path>) -> Result<Vec<R>> {
    let mut out = Vec::new();
    for path in resolve_inputs(location)? {
        out.extend(read_records_file::<R>(&path)?);
    }
    Ok(out)
}

/// Load an input location as a source collection of `p`.
///
/// # Errors
/// Same as [`read_records`].
pub fn load<R: FromFields + RFBound>(p: &Pipeline, location: impl AsRef<Path>) -> Result<PCollection<R>> {
    let location = location.as_ref();
    let records = read_records::<R>(location)?;
    info!("loaded {} {} records from {}", records.len(), R::KIND, location.display());
    Ok(from_vec(p, records))
}
