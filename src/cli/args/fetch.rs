use super::global::CommonArgs;
use clap::Parser;
use std::path::PathBuf;

/// Download and extract King County file geodatabase archives
#[derive(Parser, Debug)]
#[command(name = "fetch-gdbs")]
#[command(version)]
#[command(after_help = "Archives are staged under <DEST>/zip and extracted to <DEST>/gdb.")]
pub struct FetchArgs {
    /// Directory that receives the zip/ and gdb/ subdirectories
    #[arg(default_value = ".")]
    pub dest: PathBuf,

    /// Themes to fetch (default: every known theme)
    #[arg(short, long, num_args = 1.., value_name = "THEME")]
    pub themes: Vec<String>,

    /// File with one theme per line (# starts a comment)
    #[arg(long, value_name = "FILE")]
    pub theme_file: Option<PathBuf>,

    /// Base URL of the archive server
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Reuse archives already present in the staging directory
    #[arg(long)]
    pub reuse_archives: bool,

    /// Number of retry attempts per archive
    #[arg(long, value_name = "N")]
    pub retry: Option<u32>,

    #[command(flatten)]
    pub common: CommonArgs,
}
