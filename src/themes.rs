//! Theme catalog and theme selection.
//!
//! A theme is a thematic subset of county data distributed as one geodatabase
//! archive. The [`ThemeCatalog`] is the immutable set of known themes; a
//! [`ThemeSelection`] is what a single fetch run asks for, gathered from
//! command-line arguments and an optional theme list file.

use crate::error::{GisError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};

/// The standard thematic geodatabases, excluding topographic contour lines.
pub const DEFAULT_THEMES: &[&str] = &[
    "admin",
    "census",
    "district",
    "enviro",
    "hydro",
    "natres",
    "planning",
    "politicl",
    "property",
    "pubsafe",
    "recreatn",
    "survey",
    "topo",
    "transportation",
    "utility",
];

/// Immutable set of known theme names, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCatalog {
    themes: Vec<String>,
}

impl ThemeCatalog {
    pub fn new<I, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let themes = themes
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| seen.insert(t.clone()))
            .collect();
        Self { themes }
    }

    pub fn contains(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Comma-separated list for help and error messages.
    pub fn describe(&self) -> String {
        self.themes.join(", ")
    }

    /// Check a name given explicitly by the user.
    pub fn validate(&self, theme: &str) -> Result<()> {
        if self.contains(theme) {
            Ok(())
        } else {
            Err(GisError::InvalidInput(format!(
                "Unknown theme '{}'. Choose from {}",
                theme,
                self.describe()
            )))
        }
    }

    /// Look up a theme by name.
    pub fn theme(&self, name: &str) -> Result<Theme> {
        self.validate(name)?;
        Ok(Theme(name.to_string()))
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_THEMES.iter().copied())
    }
}

/// A validated theme belonging to the catalog it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Theme(String);

impl Theme {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Archive file name on the remote server.
    pub fn archive_name(&self) -> String {
        format!("{}GDB.zip", self.0)
    }

    /// Directory prefix of the geodatabase inside the archive.
    pub fn archive_gdb_prefix(&self) -> String {
        format!("{}GDB/KingCounty_GDB_{}.gdb/", self.0, self.0)
    }

    /// Local geodatabase directory name.
    pub fn gdb_dir_name(&self) -> String {
        format!("{}.gdb", self.0)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The effective set of themes for one fetch run.
#[derive(Debug, Default)]
pub struct ThemeSelection {
    pub themes: Vec<Theme>,
}

impl ThemeSelection {
    /// Collect themes from explicit arguments and a theme list file.
    ///
    /// - With neither source, the whole catalog is selected.
    /// - Explicit names must be in the catalog; an unknown one is an error.
    /// - File entries not in the catalog are dropped.
    /// - With both sources, the file narrows the explicit list: only file
    ///   entries that were also given explicitly are kept, in file order.
    /// - Blank lines and lines starting with `#` are skipped.
    /// - Names are deduplicated preserving order (first occurrence wins).
    pub async fn collect(
        catalog: &ThemeCatalog,
        explicit: Vec<String>,
        theme_file: Option<&Path>,
    ) -> Result<Self> {
        if explicit.is_empty() && theme_file.is_none() {
            return Ok(Self::all(catalog));
        }

        let mut requested = Vec::new();
        for name in explicit {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            catalog.validate(name)?;
            requested.push(name.to_string());
        }

        let names = match theme_file {
            Some(path) => {
                let mut listed = Vec::new();
                for name in read_theme_file(path).await? {
                    if !catalog.contains(&name) {
                        tracing::debug!("Dropping unknown theme '{}' from {}", name, path.display());
                        continue;
                    }
                    if !requested.is_empty() && !requested.contains(&name) {
                        tracing::debug!("Skipping '{}' from {}: not in --themes", name, path.display());
                        continue;
                    }
                    listed.push(name);
                }
                listed
            }
            None => requested,
        };

        let mut seen = HashSet::new();
        let themes: Vec<Theme> = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .map(Theme)
            .collect();

        if themes.is_empty() {
            return Err(GisError::Config(
                "No valid themes selected. Choose from ".to_string() + &catalog.describe(),
            ));
        }

        Ok(Self { themes })
    }

    /// Select every theme in the catalog.
    pub fn all(catalog: &ThemeCatalog) -> Self {
        Self {
            themes: catalog.iter().map(|t| Theme(t.to_string())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// Read theme names from a file (one per line).
async fn read_theme_file(path: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(path).await.map_err(|e| {
        GisError::Config(format!("Cannot read theme file {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();
    let mut names = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            names.push(trimmed.to_string());
        }
    }

    Ok(names)
}

/// Local layout of a fetch destination.
#[derive(Debug, Clone)]
pub struct FetchLayout {
    root: PathBuf,
}

impl FetchLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staging directory for downloaded archives.
    pub fn zip_dir(&self) -> PathBuf {
        self.root.join("zip")
    }

    /// Parent directory of extracted geodatabases.
    pub fn gdb_dir(&self) -> PathBuf {
        self.root.join("gdb")
    }

    pub fn archive_path(&self, theme: &Theme) -> PathBuf {
        self.zip_dir().join(theme.archive_name())
    }

    pub fn gdb_path(&self, theme: &Theme) -> PathBuf {
        self.gdb_dir().join(theme.gdb_dir_name())
    }
}
