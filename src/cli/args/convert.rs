use super::global::CommonArgs;
use crate::convert::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Convert file geodatabases to GeoPackage or PostGIS with ogr2ogr
#[derive(Parser, Debug)]
#[command(name = "convert-gdb")]
#[command(version)]
pub struct ConvertArgs {
    /// A .gdb directory or a directory containing .gdb directories
    pub source: PathBuf,

    /// Output format
    #[arg(value_enum, ignore_case = true)]
    pub format: OutputFormat,

    /// Output directory (GPKG) or connection string (PostgreSQL)
    pub destination: String,

    /// Split by layer (GPKG) or load each geodatabase into its own schema (PostgreSQL)
    #[arg(short, long)]
    pub split: bool,

    /// Prefix split GeoPackage names with the geodatabase theme
    #[arg(short, long, requires = "split")]
    pub prefix: bool,

    /// Create the output directory if it does not exist
    #[arg(long)]
    pub create_dest: bool,

    /// Print the ogr2ogr commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Continue with the next item after a failure
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}
