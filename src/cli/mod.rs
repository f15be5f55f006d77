//! Command-line front ends for the three programs.
//!
//! - [`args`]: clap argument structs and the shared STYLES constant
//! - [`commands`]: handlers that turn parsed arguments into a batch run

pub mod args;
pub mod commands;

pub use args::{parse_args, CommonArgs, ConvertArgs, FetchArgs, MergeArgs, STYLES};
pub use commands::{run_convert, run_fetch, run_merge};

use tracing_subscriber::EnvFilter;

/// Initialize logging: `debug` with `--verbose`, `warn` otherwise.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
