use super::finish_report;
use crate::cli::args::MergeArgs;
use crate::context::AppContext;
use crate::error::{GisError, Result};
use crate::merge::{discover_gpkgs, Merger};
use crate::ogr::{locate_tool, DryRunRunner, ProcessRunner};
use crate::report::FailurePolicy;
use std::path::PathBuf;

pub async fn run_merge(args: MergeArgs, ctx: AppContext) -> Result<()> {
    let sources = discover_gpkgs(&args.src_dir, &args.dest_gpkg)?;

    if let Some(parent) = args.dest_gpkg.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(GisError::Config(format!(
                "Destination directory does not exist: {}",
                parent.display()
            )));
        }
    }

    println!(
        "Merging {} geopackage(s) into {}",
        sources.len(),
        args.dest_gpkg.display()
    );

    let policy = FailurePolicy::from_keep_going(args.keep_going);
    let report = if args.dry_run {
        let ogr2ogr = PathBuf::from(&ctx.config.ogr.ogr2ogr);
        Merger::new(ogr2ogr, ctx.ogr_options(), &DryRunRunner, policy)
            .run(&sources, &args.dest_gpkg)
            .await
    } else {
        let ogr2ogr = locate_tool(&ctx.config.ogr.ogr2ogr)?;
        Merger::new(ogr2ogr, ctx.ogr_options(), &ProcessRunner, policy)
            .run(&sources, &args.dest_gpkg)
            .await
    };

    finish_report(report, args.common.report.as_deref())
}
