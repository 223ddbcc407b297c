//! Utterance-table ingestion and STM emission.
//!
//! Reads per-recording tab-separated utterance tables, drops excluded rows,
//! normalizes the text with the section's language rules and emits two
//! aligned STM files (raw and normalized) sorted by recording and start
//! time, plus a diagnostic character histogram.

mod histogram;
pub mod subselect;

pub use histogram::CharHistogram;

use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::normalize::Normalizer;

/// One transcribed or translated utterance tied to a time span within a
/// recording. Start and end times keep their original spelling so output
/// lines reproduce the source tables byte for byte.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub file_id: String,
    pub channel_id: String,
    pub speaker_id: String,
    pub start_time: String,
    pub end_time: String,
    pub language_label: String,
    pub raw_text: String,
    pub normalized_text: String,
}

impl Utterance {
    /// The composite key used to match rows against the exclusion list.
    pub fn exclusion_key(file_id: &str, start: &str, end: &str) -> String {
        format!("{file_id} {start} {end}")
    }

    fn stm_line(&self, text: &str) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.file_id,
            self.channel_id,
            self.speaker_id,
            self.start_time,
            self.end_time,
            self.language_label,
            text
        )
    }
}

/// Utterances grouped by recording, keyed by start time.
///
/// A later insert at the same (file_id, start_time) silently replaces the
/// earlier record; the source tables are trusted not to collide except where
/// a re-transcribed row supersedes the previous one.
#[derive(Debug, Default)]
pub struct UtteranceTable {
    // Start times are non-negative seconds, and non-negative IEEE-754
    // doubles order the same as their bit patterns, so the raw bits double
    // as a sortable map key.
    files: BTreeMap<String, BTreeMap<u64, Utterance>>,
}

impl UtteranceTable {
    pub fn insert(&mut self, start_secs: f64, utterance: Utterance) {
        let by_time = self.files.entry(utterance.file_id.clone()).or_default();
        if let Some(previous) = by_time.insert(start_secs.to_bits(), utterance) {
            debug!(
                "Replaced utterance {} {} with a later row",
                previous.file_id, previous.start_time
            );
        }
    }

    /// Iterate in emission order: file_id lexicographic, start time numeric.
    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.files.values().flat_map(|by_time| by_time.values())
    }

    pub fn len(&self) -> usize {
        self.files.values().map(|by_time| by_time.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Counters reported after one preparation pass.
#[derive(Debug, Clone, Copy)]
pub struct PrepareReport {
    pub tables: usize,
    pub emitted: usize,
    pub excluded: usize,
}

/// Load the exclusion list: one `"file_id start end"` key per line.
pub fn load_exclusions(path: &Path) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read exclusion list {}", path.display()))?;

    Ok(content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Prepare one corpus section: every `.tsv` table in `tables_dir` becomes
/// part of `<output_stem>.raw.stm`, `<output_stem>.norm.stm` and
/// `<output_stem>.char_histogram`.
pub fn prepare_stm(
    tables_dir: &Path,
    output_stem: &Path,
    label: &str,
    channel_id: &str,
    exclusions: &HashSet<String>,
) -> Result<PrepareReport> {
    let normalizer = Normalizer::for_language(label)?;

    let mut table = UtteranceTable::default();
    let mut tables = 0usize;
    let mut excluded = 0usize;

    for tsv_path in find_tables(tables_dir)? {
        tables += 1;
        ingest_table(
            &tsv_path,
            label,
            channel_id,
            &normalizer,
            exclusions,
            &mut table,
            &mut excluded,
        )?;
    }

    let raw_path = append_suffix(output_stem, ".raw.stm");
    let norm_path = append_suffix(output_stem, ".norm.stm");
    let hist_path = append_suffix(output_stem, ".char_histogram");

    let mut raw_out = create_writer(&raw_path)?;
    let mut norm_out = create_writer(&norm_path)?;
    let mut histogram = CharHistogram::default();

    for utterance in table.iter() {
        writeln!(raw_out, "{}", utterance.stm_line(&utterance.raw_text))?;
        writeln!(norm_out, "{}", utterance.stm_line(&utterance.normalized_text))?;
        histogram.record_raw(&utterance.raw_text);
        histogram.record_norm(&utterance.normalized_text);
    }

    raw_out.flush()?;
    norm_out.flush()?;
    histogram.write_to(&hist_path)?;

    let report = PrepareReport {
        tables,
        emitted: table.len(),
        excluded,
    };
    info!(
        "Prepared {}: {} utterances from {} tables ({} excluded)",
        output_stem.display(),
        report.emitted,
        report.tables,
        report.excluded
    );

    Ok(report)
}

/// Non-recursive scan for `.tsv` tables, sorted for deterministic ingest.
fn find_tables(tables_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(tables_dir).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to scan table directory {}", tables_dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("tsv") {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    Ok(paths)
}

fn ingest_table(
    tsv_path: &Path,
    label: &str,
    channel_id: &str,
    normalizer: &Normalizer,
    exclusions: &HashSet<String>,
    table: &mut UtteranceTable,
    excluded: &mut usize,
) -> Result<()> {
    let file_id = table_file_id(tsv_path)?;
    let content = std::fs::read_to_string(tsv_path)
        .with_context(|| format!("Failed to read table {}", tsv_path.display()))?;

    for (index, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        let [start, end, speaker, text] = fields.as_slice() else {
            bail!(
                "{}:{}: expected 4 tab-separated fields, found {}",
                tsv_path.display(),
                index + 1,
                fields.len()
            );
        };

        let key = Utterance::exclusion_key(&file_id, start, end);
        if exclusions.contains(&key) {
            debug!("Excluding utterance {key}");
            *excluded += 1;
            continue;
        }

        let start_secs: f64 = start.parse().with_context(|| {
            format!("{}:{}: invalid start time {start:?}", tsv_path.display(), index + 1)
        })?;

        table.insert(
            start_secs,
            Utterance {
                file_id: file_id.clone(),
                channel_id: channel_id.to_string(),
                speaker_id: speaker.to_string(),
                start_time: start.to_string(),
                end_time: end.to_string(),
                language_label: label.to_string(),
                raw_text: text.to_string(),
                normalized_text: normalizer.run(text),
            },
        );
    }

    Ok(())
}

/// Recording identifier: the table's file name up to the first period.
fn table_file_id(tsv_path: &Path) -> Result<String> {
    let name = tsv_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Table has no usable file name: {}", tsv_path.display()))?;

    Ok(name.split('.').next().unwrap_or(name).to_string())
}

pub(crate) fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Append a literal suffix to a path, `foo` + `.raw.stm` -> `foo.raw.stm`.
pub fn append_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
