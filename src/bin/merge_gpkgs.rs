use kcgis::cli::{self, MergeArgs};
use kcgis::context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: MergeArgs = cli::parse_args();
    cli::init_logging(args.common.verbose);

    let ctx = AppContext::new(args.common.config.as_deref())?;
    cli::run_merge(args, ctx).await?;

    Ok(())
}
