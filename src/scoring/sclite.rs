use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use which::which;

/// Aggregate result parsed from a scorer summary report. Both fields keep
/// the scorer's own spelling; nothing downstream does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    pub token_count: String,
    pub error_rate: String,
}

/// Narrow seam around the external alignment scorer, so the scorer stays a
/// swappable collaborator rather than part of the pipeline.
pub trait Scorer {
    /// Align `reference` against `hypothesis`, leaving the full report at
    /// `report`. Returns the parsed summary, or `None` when the report
    /// carries no usable summary line.
    fn score(
        &self,
        reference: &Path,
        hypothesis: &Path,
        report: &Path,
    ) -> Result<Option<ScoreSummary>>;
}

/// The SCTK `sclite` binary.
pub struct Sclite {
    binary: PathBuf,
}

impl Sclite {
    /// Resolve the scorer from an explicit path or a command name on PATH.
    pub fn locate(path_or_name: &str) -> Result<Self> {
        let candidate = Path::new(path_or_name);
        let binary = if candidate.is_file() {
            candidate.to_path_buf()
        } else {
            which(path_or_name)
                .with_context(|| format!("sclite binary {path_or_name:?} not found"))?
        };

        debug!("Using scorer at {}", binary.display());
        Ok(Self { binary })
    }
}

impl Scorer for Sclite {
    fn score(
        &self,
        reference: &Path,
        hypothesis: &Path,
        report: &Path,
    ) -> Result<Option<ScoreSummary>> {
        let report_file = File::create(report)
            .with_context(|| format!("Failed to create {}", report.display()))?;

        let output = Command::new(&self.binary)
            .arg("-r")
            .arg(reference)
            .arg("trn")
            .arg("-h")
            .arg(hypothesis)
            .arg("trn")
            .args(["-i", "rm"])
            .args(["-o", "sum", "stdout"])
            .stdout(Stdio::from(report_file))
            .output()
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Scorer failed on {} (exit status: {}): {}",
                hypothesis.display(),
                output.status,
                stderr.trim()
            );
        }

        let content = std::fs::read_to_string(report)
            .with_context(|| format!("Failed to read scorer report {}", report.display()))?;
        Ok(parse_summary(&content))
    }
}

/// Parse the `| Sum/Avg|` line of a scorer summary report. After splitting
/// on whitespace, the token count sits at field 3 and the aggregate error
/// rate at field 9.
pub fn parse_summary(report: &str) -> Option<ScoreSummary> {
    let line = report
        .lines()
        .find(|line| line.trim_start().starts_with("| Sum/Avg|"))?;

    let fields: Vec<&str> = line.split_whitespace().collect();
    match (fields.get(3), fields.get(9)) {
        (Some(token_count), Some(error_rate)) => Some(ScoreSummary {
            token_count: (*token_count).to_string(),
            error_rate: (*error_rate).to_string(),
        }),
        _ => None,
    }
}
