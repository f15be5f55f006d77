use super::finish_report;
use crate::cli::args::ConvertArgs;
use crate::context::AppContext;
use crate::convert::{
    discover_gdbs, ConversionPlanner, ConvertOptions, ConvertTarget, Converter, OutputFormat,
};
use crate::error::Result;
use crate::ogr::{locate_tool, DryRunRunner, OgrInfo, ProcessRunner};
use crate::report::FailurePolicy;
use std::path::PathBuf;

pub async fn run_convert(args: ConvertArgs, ctx: AppContext) -> Result<()> {
    let target = ConvertTarget::parse(args.format, &args.destination)?;
    let gdbs = discover_gdbs(&args.source)?;
    target.prepare(args.create_dest || ctx.config.convert.create_dest)?;

    println!("Found {} geodatabase(s) in {}", gdbs.len(), args.source.display());

    let ogr = &ctx.config.ogr;
    let ogr2ogr = if args.dry_run {
        PathBuf::from(&ogr.ogr2ogr)
    } else {
        locate_tool(&ogr.ogr2ogr)?
    };
    // Layer listing is read-only, so it also runs during a dry run.
    let ogrinfo = if args.split && args.format == OutputFormat::Gpkg {
        locate_tool(&ogr.ogrinfo)?
    } else {
        PathBuf::from(&ogr.ogrinfo)
    };

    let planner = ConversionPlanner::new(ogr2ogr, ctx.ogr_options());
    let lister = OgrInfo::new(ogrinfo);
    let options = ConvertOptions {
        split: args.split,
        prefix: args.prefix,
        policy: FailurePolicy::from_keep_going(args.keep_going),
    };

    let report = if args.dry_run {
        Converter::new(planner, &DryRunRunner, &lister, options)
            .run(&gdbs, &target)
            .await
    } else {
        Converter::new(planner, &ProcessRunner, &lister, options)
            .run(&gdbs, &target)
            .await
    };

    finish_report(report, args.common.report.as_deref())
}
