use kcgis::cli::{self, FetchArgs};
use kcgis::context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: FetchArgs = cli::parse_args();
    cli::init_logging(args.common.verbose);

    let ctx = AppContext::new(args.common.config.as_deref())?;
    cli::run_fetch(args, ctx).await?;

    Ok(())
}
