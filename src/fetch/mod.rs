//! Theme archive fetching.
//!
//! A fetch run has two phases. First every selected theme's archive is
//! downloaded into the `zip/` staging directory; then every archive that is
//! present is extracted into `gdb/<theme>.gdb`. A failure on one theme is
//! recorded and the run moves on to the next.

pub mod download;
pub mod extract;

pub use download::{ArchiveDownloader, DownloadOptions};
pub use extract::extract_gdb;

use crate::error::{GisError, Result};
use crate::report::{BatchReport, FailurePolicy, ItemReport};
use crate::themes::{FetchLayout, Theme, ThemeSelection};
use crate::utils::human_bytes;
use colored::Colorize;

/// Downloads and extracts theme archives into a [`FetchLayout`].
pub struct Fetcher {
    downloader: ArchiveDownloader,
    layout: FetchLayout,
    /// Use an archive already present in the staging directory instead of
    /// downloading it again
    reuse_archives: bool,
}

impl Fetcher {
    pub fn new(downloader: ArchiveDownloader, layout: FetchLayout, reuse_archives: bool) -> Self {
        Self {
            downloader,
            layout,
            reuse_archives,
        }
    }

    pub fn layout(&self) -> &FetchLayout {
        &self.layout
    }

    /// Fetch every theme in the selection.
    ///
    /// Only configuration problems (an unusable destination) are returned as
    /// errors; per-theme failures end up in the report.
    pub async fn run(&self, selection: &ThemeSelection) -> Result<BatchReport> {
        let mut report = BatchReport::new("fetch-gdbs");
        let policy = FailurePolicy::Continue;

        tokio::fs::create_dir_all(self.layout.zip_dir())
            .await
            .map_err(|e| {
                GisError::Config(format!(
                    "Cannot create staging directory {}: {}",
                    self.layout.zip_dir().display(),
                    e
                ))
            })?;

        let mut ready = Vec::new();
        for theme in &selection.themes {
            let item = self.fetch_archive(theme).await;
            if !item.is_failed() {
                ready.push(theme);
            }
            report.record(item, policy);
        }

        if !ready.is_empty() {
            tokio::fs::create_dir_all(self.layout.gdb_dir()).await?;
        }

        for theme in ready {
            let item = self.extract_archive(theme).await;
            report.record(item, policy);
        }

        report.finish();
        Ok(report)
    }

    async fn fetch_archive(&self, theme: &Theme) -> ItemReport {
        let archive = self.layout.archive_path(theme);

        if self.reuse_archives && archive.is_file() {
            println!("Using existing archive for {}", theme);
            return ItemReport::skipped(
                theme.as_str(),
                "download",
                format!("reused {}", archive.display()),
            );
        }

        println!("Downloading {}...", theme);
        match self.downloader.download(theme, &archive).await {
            Ok(bytes) => {
                tracing::info!("Saved {} ({})", archive.display(), human_bytes(bytes));
                ItemReport::success_with_bytes(theme.as_str(), "download", bytes)
            }
            Err(e) => {
                eprintln!("{} {}: {}", "Download failed:".red(), theme, e);
                ItemReport::failed(theme.as_str(), "download", e.to_string())
            }
        }
    }

    async fn extract_archive(&self, theme: &Theme) -> ItemReport {
        println!("Extracting {}...", theme);

        let archive = self.layout.archive_path(theme);
        let gdb_dir = self.layout.gdb_path(theme);
        let owned_theme = theme.clone();
        let result =
            tokio::task::spawn_blocking(move || extract_gdb(&archive, &owned_theme, &gdb_dir)).await;

        match result {
            Ok(Ok(count)) => {
                tracing::info!("Extracted {} file(s) for {}", count, theme);
                ItemReport::success(theme.as_str(), "extract")
            }
            Ok(Err(e)) => {
                eprintln!("{} {}: {}", "Extraction failed:".red(), theme, e);
                ItemReport::failed(theme.as_str(), "extract", e.to_string())
            }
            Err(join_err) => ItemReport::failed(
                theme.as_str(),
                "extract",
                format!("extraction task failed: {}", join_err),
            ),
        }
    }
}
