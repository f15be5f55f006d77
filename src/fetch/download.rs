use crate::error::{GisError, Result};
use crate::themes::Theme;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Download configuration options.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Base URL under which `<theme>GDB.zip` archives live
    pub base_url: Url,
    /// Number of retry attempts (0 = single attempt)
    pub retry_count: u32,
    /// Base delay between retries (exponential backoff)
    pub retry_delay: Duration,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Show a byte-level progress bar
    pub progress: bool,
}

impl DownloadOptions {
    /// Options for `base_url` with no retry and a five minute timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            retry_count: 0,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
            progress: true,
        }
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt - 1)`, saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Downloads theme archives one at a time.
pub struct ArchiveDownloader {
    client: reqwest::Client,
    options: DownloadOptions,
}

impl ArchiveDownloader {
    pub fn new(options: DownloadOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kcgis/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(options.timeout)
            .build()?;

        Ok(Self { client, options })
    }

    /// Remote URL of a theme's archive.
    pub fn archive_url(&self, theme: &Theme) -> Result<Url> {
        let mut base = self.options.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&theme.archive_name()).map_err(|e| GisError::Download {
            theme: theme.to_string(),
            url: self.options.base_url.to_string(),
            message: format!("cannot build archive URL: {}", e),
            is_retriable: false,
        })
    }

    /// Download a theme archive to `dest`, retrying with exponential backoff.
    ///
    /// Returns the number of bytes written.
    pub async fn download(&self, theme: &Theme, dest: &Path) -> Result<u64> {
        let url = self.archive_url(theme)?;
        let mut attempt = 0;

        loop {
            match self.download_once(theme, &url, dest).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < self.options.retry_count && e.is_retriable() => {
                    attempt += 1;
                    let delay = backoff_delay(self.options.retry_delay, attempt);
                    tracing::warn!(
                        "Retry {}/{} for {} in {:?}: {}",
                        attempt,
                        self.options.retry_count,
                        theme,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn download_once(&self, theme: &Theme, url: &Url, dest: &Path) -> Result<u64> {
        let parent = dest
            .parent()
            .ok_or_else(|| GisError::Path(format!("{} has no parent", dest.display())))?;
        tokio::fs::create_dir_all(parent).await?;

        tracing::info!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(GisError::Download {
                theme: theme.to_string(),
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
                is_retriable: response.status().is_server_error(),
            });
        }

        let pb = self.progress_bar(response.content_length());

        // Stream into a temp file in the staging directory; it is removed on
        // drop unless persisted, so failures never leave a partial archive.
        let temp = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(parent)?;
        let mut file = tokio::fs::File::from_std(temp.reopen()?);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            pb.inc(chunk.len() as u64);
        }

        file.flush().await?;
        drop(file);
        pb.finish_and_clear();

        temp.persist(dest).map_err(|e| GisError::Io(e.error))?;
        Ok(written)
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.options.progress {
            return ProgressBar::hidden();
        }

        match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .expect("valid progress template")
                        .progress_chars("#>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {bytes} ({bytes_per_sec})")
                        .expect("valid progress template"),
                );
                pb
            }
        }
    }
}
