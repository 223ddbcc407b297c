use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stm_tools::stm::subselect;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "subselect-stm")]
#[command(about = "Subselect an STM by file id list, to create train/dev splits", long_about = None)]
struct Cli {
    /// Input STM
    #[arg(long)]
    stm_in: PathBuf,

    /// Output STM
    #[arg(long)]
    stm_out: PathBuf,

    /// List of selected file ids, e.g. train.file_id.txt
    #[arg(long)]
    fileid: PathBuf,

    /// Full path to the audio file directory
    #[arg(long)]
    audiopath: PathBuf,

    /// Audio filename extension
    #[arg(long, default_value = ".sph")]
    audiosuffix: String,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let selected = subselect::load_file_ids(&cli.fileid)?;
    subselect::subselect_stm(
        &cli.stm_in,
        &cli.stm_out,
        &selected,
        &cli.audiopath,
        &cli.audiosuffix,
    )?;

    Ok(())
}
