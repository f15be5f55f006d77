use kcgis::cli::{self, ConvertArgs};
use kcgis::context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: ConvertArgs = cli::parse_args();
    cli::init_logging(args.common.verbose);

    let ctx = AppContext::new(args.common.config.as_deref())?;
    cli::run_convert(args, ctx).await?;

    Ok(())
}
