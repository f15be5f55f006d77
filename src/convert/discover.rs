//! Geodatabase discovery.

use crate::error::{GisError, Result};
use std::path::{Path, PathBuf};

pub const GDB_SUFFIX: &str = "gdb";

/// A file geodatabase handed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdbSource {
    pub path: PathBuf,
    /// File name without the `.gdb` extension
    pub theme: String,
}

impl GdbSource {
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let theme = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GisError::Path(format!("Invalid geodatabase path: {}", path.display())))?
            .to_string();
        Ok(Self { path, theme })
    }
}

fn has_gdb_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(GDB_SUFFIX))
}

/// Resolve a source argument to the geodatabases it names.
///
/// A path ending in `.gdb` is a single geodatabase. Any other directory is
/// scanned (non-recursively) for `*.gdb` entries, returned in path order.
pub fn discover_gdbs(source: &Path) -> Result<Vec<GdbSource>> {
    if !source.exists() {
        return Err(GisError::Config(format!(
            "Source does not exist: {}",
            source.display()
        )));
    }

    if has_gdb_suffix(source) {
        return Ok(vec![GdbSource::from_path(source.to_path_buf())?]);
    }

    if !source.is_dir() {
        return Err(GisError::Config(format!(
            "Source is neither a geodatabase nor a directory: {}",
            source.display()
        )));
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&source.to_string_lossy()),
        GDB_SUFFIX
    );
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| GisError::Path(format!("Invalid source pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(GisError::Config(format!(
            "No geodatabases found in {}",
            source.display()
        )));
    }

    paths.into_iter().map(GdbSource::from_path).collect()
}
