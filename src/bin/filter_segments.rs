use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stm_tools::segments;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filter-segments")]
#[command(
    about = "Drop the known-bad segment lines from a decoder output aligned with the segment index",
    long_about = None
)]
struct Cli {
    /// The distribution's segment index (data/segments.txt)
    #[arg(long)]
    segments: PathBuf,

    /// File to filter, one row per segment index line
    #[arg(long)]
    input: PathBuf,

    /// Filtered output
    #[arg(long)]
    output: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    segments::filter_bad_segments(&cli.segments, &cli.input, &cli.output)
}
