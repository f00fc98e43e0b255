use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// X11 seasonal adjustment.
#[derive(Parser)]
#[command(
    name = "seasadj",
    version,
    about = "Trend, seasonal and irregular decomposition of periodic series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Decompose one or more series and write the components as CSV.
    Decompose(DecomposeArgs),
}

/// Arguments for the `decompose` subcommand.
#[derive(clap::Args)]
pub struct DecomposeArgs {
    /// Path to TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input series file (repeatable).
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// Directory receiving one `<stem>.csv` per input.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Override the decomposition mode from config.
    #[arg(short, long, value_parser = ["additive", "multiplicative"])]
    pub mode: Option<String>,

    /// Override the period from config.
    #[arg(short, long)]
    pub period: Option<f64>,
}
