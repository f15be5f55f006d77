//! Styles and argument groups shared by every program.

use clap::builder::styling::{AnsiColor, Effects};
use clap::builder::Styles;
use clap::{Args, Parser};
use std::path::PathBuf;

// Configures colored help menu colors (similar to uv)
pub const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Flags every program accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, env = "KCGIS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a JSON report of every item to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Parse arguments for any program with colored styles
pub fn parse_args<P: Parser>() -> P {
    let cmd = P::command().styles(STYLES).color(clap::ColorChoice::Auto);
    let matches = cmd.get_matches();
    P::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}
