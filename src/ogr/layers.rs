//! Layer enumeration for file geodatabases.

use crate::error::{GisError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;

/// A layer (feature class) inside a geodatabase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    /// Geometry type as reported by the lister, absent for plain tables
    pub geometry_type: Option<String>,
}

impl LayerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry_type: None,
        }
    }
}

/// Lists the layers of a geodatabase.
#[allow(async_fn_in_trait)]
pub trait LayerLister {
    /// Layers sorted by name.
    async fn list_layers(&self, gdb: &Path) -> Result<Vec<LayerInfo>>;
}

/// Layer lister backed by `ogrinfo -ro -q`.
#[derive(Debug, Clone)]
pub struct OgrInfo {
    program: PathBuf,
}

impl OgrInfo {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl LayerLister for OgrInfo {
    async fn list_layers(&self, gdb: &Path) -> Result<Vec<LayerInfo>> {
        let output = Command::new(&self.program)
            .arg("-ro")
            .arg("-q")
            .arg(gdb)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GisError::ToolFailed {
                program: "ogrinfo".into(),
                status: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_ogrinfo_output(&stdout))
    }
}

static LAYER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+:\s+(.+?)(?:\s+\(([^()]+)\))?\s*$").unwrap());

/// Parse `ogrinfo -q` output lines of the form `1: roads (Multi Line String)`.
///
/// Lines that are not layer entries are ignored. The result is sorted by name.
pub fn parse_ogrinfo_output(output: &str) -> Vec<LayerInfo> {
    let mut layers: Vec<LayerInfo> = output
        .lines()
        .filter_map(|line| {
            let caps = LAYER_LINE.captures(line)?;
            Some(LayerInfo {
                name: caps[1].to_string(),
                geometry_type: caps.get(2).map(|m| m.as_str().to_string()),
            })
        })
        .collect();
    layers.sort_by(|a, b| a.name.cmp(&b.name));
    layers
}
