use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stm_tools::{config::Config, stm};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prepare-stm")]
#[command(about = "Create raw and normalized STM files from a distribution", long_about = None)]
struct Cli {
    /// Root of the source distribution
    #[arg(long)]
    root: PathBuf,

    /// Destination directory for the STM files, created if missing
    #[arg(long)]
    stm_dest: PathBuf,

    /// Predefined list of faulty utterances to exclude, one key per line
    #[arg(long)]
    exclude: PathBuf,

    /// Alternate corpus layout description (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::load(cli.config.as_deref())?;

    std::fs::create_dir_all(&cli.stm_dest).with_context(|| {
        format!(
            "Failed to create destination directory {}",
            cli.stm_dest.display()
        )
    })?;

    let exclusions = stm::load_exclusions(&cli.exclude)?;

    for section in &config.corpus.sections {
        stm::prepare_stm(
            &cli.root.join(&section.tables),
            &cli.stm_dest.join(&section.output_stem),
            &section.label,
            &config.corpus.channel_id,
            &exclusions,
        )?;
    }

    Ok(())
}
