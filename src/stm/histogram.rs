use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Per-character occurrence counts over the emitted raw and normalized
/// text, kept purely for diagnostics. A character whose raw and normalized
/// counts differ was touched by the normalization rules.
#[derive(Debug, Default)]
pub struct CharHistogram {
    counts: HashMap<char, CharCounts>,
}

#[derive(Debug, Default, Clone, Copy)]
struct CharCounts {
    raw: u64,
    norm: u64,
}

impl CharHistogram {
    pub fn record_raw(&mut self, text: &str) {
        for c in text.chars() {
            self.counts.entry(c).or_default().raw += 1;
        }
    }

    pub fn record_norm(&mut self, text: &str) {
        for c in text.chars() {
            self.counts.entry(c).or_default().norm += 1;
        }
    }

    /// Total characters recorded on the raw side.
    pub fn raw_total(&self) -> u64 {
        self.counts.values().map(|c| c.raw).sum()
    }

    /// Total characters recorded on the normalized side.
    pub fn norm_total(&self) -> u64 {
        self.counts.values().map(|c| c.norm).sum()
    }

    /// Write the diagnostic table, most frequent raw characters first.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);

        writeln!(out, "#character count_in_raw count_in_norm count_equal?")?;

        let mut rows: Vec<(&char, &CharCounts)> = self.counts.iter().collect();
        rows.sort_by(|(a_char, a), (b_char, b)| b.raw.cmp(&a.raw).then(a_char.cmp(b_char)));

        for (character, counts) in rows {
            writeln!(
                out,
                "{} {} {} {}",
                character,
                counts.raw,
                counts.norm,
                counts.raw == counts.norm
            )?;
        }

        out.flush()?;
        Ok(())
    }
}
