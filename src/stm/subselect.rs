//! Dataset-split subselection of STM files.
//!
//! Keeps only the records whose leading file identifier is in a selected
//! set, rewriting that identifier to the full audio path expected by the
//! recognizer. Input order is preserved; no sort happens at this stage.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Counters reported after one subselect pass.
#[derive(Debug, Clone, Copy)]
pub struct SubselectReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Load the selected file identifiers, one per line.
pub fn load_file_ids(path: &Path) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file id list {}", path.display()))?;

    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// Copy `stm_in` to `stm_out`, keeping only rows whose file identifier is
/// in `selected` and rewriting that field to
/// `<audio_dir>/<file_id><audio_suffix>`.
pub fn subselect_stm(
    stm_in: &Path,
    stm_out: &Path,
    selected: &HashSet<String>,
    audio_dir: &Path,
    audio_suffix: &str,
) -> Result<SubselectReport> {
    let content = std::fs::read_to_string(stm_in)
        .with_context(|| format!("Failed to read STM {}", stm_in.display()))?;

    let file =
        File::create(stm_out).with_context(|| format!("Failed to create {}", stm_out.display()))?;
    let mut out = BufWriter::new(file);

    let mut kept = 0usize;
    let mut dropped = 0usize;

    for line in content.lines() {
        let mut fields: Vec<&str> = line.split('\t').collect();
        let file_id = fields[0];

        if !selected.contains(file_id) {
            dropped += 1;
            continue;
        }

        let audio_path = audio_dir
            .join(format!("{file_id}{audio_suffix}"))
            .to_string_lossy()
            .into_owned();
        fields[0] = audio_path.as_str();
        writeln!(out, "{}", fields.join("\t"))?;
        kept += 1;
    }

    out.flush()?;
    info!(
        "Subselected {} -> {}: kept {} rows, dropped {}",
        stm_in.display(),
        stm_out.display(),
        kept,
        dropped
    );

    Ok(SubselectReport { kept, dropped })
}
