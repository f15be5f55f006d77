//! Geodatabase extraction from theme archives.
//!
//! Archives contain `<theme>GDB/KingCounty_GDB_<theme>.gdb/<files>` plus
//! metadata we do not need. Only the files directly under the geodatabase
//! prefix are copied into the local `<theme>.gdb` directory.

use crate::error::{GisError, Result};
use crate::themes::Theme;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use zip::ZipArchive;

/// Extract a theme's geodatabase files into `gdb_dir`, creating it if absent.
///
/// Returns the number of files written.
pub fn extract_gdb(archive: &Path, theme: &Theme, gdb_dir: &Path) -> Result<usize> {
    let prefix = theme.archive_gdb_prefix();
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    std::fs::create_dir_all(gdb_dir)?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().to_string();

        let Some(file_name) = name.strip_prefix(&prefix) else {
            continue;
        };
        if entry.is_dir() || file_name.is_empty() {
            continue;
        }
        if file_name.contains('/') {
            tracing::debug!("Skipping nested entry {}", name);
            continue;
        }

        let target = gdb_dir.join(file_name);
        tracing::debug!("{} -> {}", name, target.display());
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    if written == 0 {
        return Err(GisError::Extract {
            archive: archive.to_path_buf(),
            message: format!("no geodatabase found under '{}'", prefix),
        });
    }

    Ok(written)
}
