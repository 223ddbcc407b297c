use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use stm_tools::scoring::{score_corpora, Sclite, TextPreparer};
use stm_tools::stm::append_suffix;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wer-cer")]
#[command(about = "Compute WER and CER with sclite, with Arabic text normalization", long_about = None)]
struct Cli {
    /// Reference text, one utterance per line
    #[arg(long)]
    reference: PathBuf,

    /// Hypothesis text, line-aligned with the reference
    #[arg(long)]
    hypothesis: PathBuf,

    /// Prefix for the derived scoring files and reports
    #[arg(long)]
    work: PathBuf,

    /// Path to the sclite binary, or its command name on PATH
    #[arg(long, default_value = "sclite")]
    sclite: String,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    println!(
        "{} {}",
        cli.hypothesis.display(),
        Local::now().format("%d/%m/%Y %H:%M:%S")
    );

    let preparer = TextPreparer::new()?;
    let reference = preparer.prepare(&cli.reference, &append_suffix(&cli.work, ".ref"))?;
    let hypothesis = preparer.prepare(&cli.hypothesis, &append_suffix(&cli.work, ".hyp"))?;

    let scorer = Sclite::locate(&cli.sclite)?;
    let outcomes = score_corpora(&scorer, &reference, &hypothesis, &cli.work)?;

    for outcome in outcomes {
        if let Some(summary) = outcome.summary {
            println!(
                "{}: #hyp_token= {} error_rate= {}",
                outcome.label, summary.token_count, summary.error_rate
            );
        }
    }

    Ok(())
}
