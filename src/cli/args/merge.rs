use super::global::CommonArgs;
use clap::Parser;
use std::path::PathBuf;

/// Append every GeoPackage in a directory into one GeoPackage
#[derive(Parser, Debug)]
#[command(name = "merge-gpkgs")]
#[command(version)]
pub struct MergeArgs {
    /// Directory containing the GeoPackages to merge
    pub src_dir: PathBuf,

    /// Destination GeoPackage (created if missing, appended to otherwise)
    pub dest_gpkg: PathBuf,

    /// Print the ogr2ogr commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Continue with the next file after a failure
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}
