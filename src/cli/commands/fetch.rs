use super::finish_report;
use crate::cli::args::FetchArgs;
use crate::context::AppContext;
use crate::error::{GisError, Result};
use crate::fetch::{ArchiveDownloader, DownloadOptions, Fetcher};
use crate::themes::{FetchLayout, ThemeSelection};
use std::io::IsTerminal;
use std::time::Duration;
use url::Url;

pub async fn run_fetch(args: FetchArgs, ctx: AppContext) -> Result<()> {
    let ctx = ctx.with_base_url(args.base_url)?;
    let fetch = &ctx.config.fetch;

    let catalog = ctx.catalog();
    let selection =
        ThemeSelection::collect(&catalog, args.themes, args.theme_file.as_deref()).await?;

    let base_url = Url::parse(&fetch.base_url)
        .map_err(|e| GisError::Config(format!("Invalid base URL '{}': {}", fetch.base_url, e)))?;

    let root = std::path::absolute(&args.dest)?;
    let options = DownloadOptions {
        base_url,
        retry_count: args.retry.unwrap_or(fetch.retry_count),
        retry_delay: Duration::from_secs(fetch.retry_delay_secs),
        timeout: Duration::from_secs(fetch.timeout_secs),
        progress: std::io::stderr().is_terminal(),
    };
    let downloader = ArchiveDownloader::new(options)?;
    let fetcher = Fetcher::new(downloader, FetchLayout::new(root), args.reuse_archives);

    println!(
        "Fetching {} theme(s) into {}",
        selection.len(),
        fetcher.layout().root().display()
    );

    let report = fetcher.run(&selection).await?;
    finish_report(report, args.common.report.as_deref())
}
