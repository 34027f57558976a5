use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Query arXiv for recent papers matching the configured author, topic and
/// category filters, and email the digest.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the digest configuration file
    #[arg(short, long, value_name = "FILE", default_value = "digest.toml")]
    pub config: PathBuf,

    /// Run as if today were DATE (YYYY-MM-DD); the digest still reports on
    /// DATE minus the configured lag
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Print the rendered report to stdout instead of emailing it
    #[arg(long)]
    pub dry_run: bool,
}
