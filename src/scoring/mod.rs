//! Scoring-corpus preparation and WER/CER evaluation.
//!
//! Turns plain reference/hypothesis text into the `trn` corpora an external
//! alignment scorer expects — word- and character-level, original and
//! Arabic-normalized — then drives the scorer once per combination and
//! collects one summary per run.

mod sclite;

pub use sclite::{parse_summary, ScoreSummary, Scorer, Sclite};

use anyhow::{Context, Result};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::stm::{append_suffix, create_writer};

/// Visible glyph standing in for inter-word spaces in the character-level
/// corpora, so the scorer treats word boundaries as alignable tokens.
pub const WORD_SPACE: char = '▁';

/// Paths of the four derived corpora for one input file.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub original_words: PathBuf,
    pub normalized_words: PathBuf,
    pub original_chars: PathBuf,
    pub normalized_chars: PathBuf,
}

/// Prepares scoring text: an Arabic-and-digits allow-list filter followed
/// by a fixed table collapsing letter-final variants to their base forms.
pub struct TextPreparer {
    allow_filter: Regex,
}

impl TextPreparer {
    pub fn new() -> Result<Self, regex::Error> {
        // Keep only Arabic letters, ASCII digits and space
        let allow_filter = Regex::new("[^اأإآبتثجحخدذرزسشصضطظعغفقكلمنهويىئءؤة0-9 ]")?;

        Ok(Self { allow_filter })
    }

    /// Normalize one line for scoring.
    pub fn normalize(&self, text: &str) -> String {
        self.allow_filter
            .replace_all(text, "")
            .chars()
            .map(fold_char)
            .collect()
    }

    /// Derive the four corpora for `input`, one line per input line, each
    /// tagged with a synthetic speaker id from its 0-based line number.
    pub fn prepare(&self, input: &Path, out_prefix: &Path) -> Result<PreparedCorpus> {
        let corpus = PreparedCorpus {
            original_words: append_suffix(out_prefix, ".original_words"),
            normalized_words: append_suffix(out_prefix, ".normalized_words"),
            original_chars: append_suffix(out_prefix, ".original_chars"),
            normalized_chars: append_suffix(out_prefix, ".normalized_chars"),
        };

        let content = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let mut original_words_out = create_writer(&corpus.original_words)?;
        let mut normalized_words_out = create_writer(&corpus.normalized_words)?;
        let mut original_chars_out = create_writer(&corpus.original_chars)?;
        let mut normalized_chars_out = create_writer(&corpus.normalized_chars)?;

        for (count, line) in content.lines().enumerate() {
            let original_words = line.trim_end();
            let normalized_words = self.normalize(original_words);

            writeln!(original_words_out, "{original_words} (spk_{count})")?;
            writeln!(normalized_words_out, "{normalized_words} (spk_{count})")?;
            writeln!(
                original_chars_out,
                "{} (spk_{count})",
                spaced_chars(original_words)
            )?;
            writeln!(
                normalized_chars_out,
                "{} (spk_{count})",
                spaced_chars(&normalized_words)
            )?;
        }

        original_words_out.flush()?;
        normalized_words_out.flush()?;
        original_chars_out.flush()?;
        normalized_chars_out.flush()?;

        debug!("Prepared scoring corpora for {}", input.display());
        Ok(corpus)
    }
}

/// Collapse diacritic/letter-final variants to their base forms.
fn fold_char(c: char) -> char {
    match c {
        'ة' => 'ه',
        'ى' => 'ي',
        'أ' | 'إ' | 'آ' => 'ا',
        other => other,
    }
}

/// Character-level rendition: spaces become the visible word-boundary
/// glyph, and every character is separated by a single space.
fn spaced_chars(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(if c == ' ' { WORD_SPACE } else { c });
    }
    out
}

/// Result of one scorer invocation.
#[derive(Debug)]
pub struct ScoreOutcome {
    pub label: String,
    pub summary: Option<ScoreSummary>,
}

/// Run the scorer for each granularity (words, characters) and
/// normalization state (original, normalized), sequentially.
///
/// A run whose report lacks a usable summary line yields an outcome with no
/// summary; a scorer that cannot be executed aborts the whole batch.
pub fn score_corpora(
    scorer: &dyn Scorer,
    reference: &PreparedCorpus,
    hypothesis: &PreparedCorpus,
    work_prefix: &Path,
) -> Result<Vec<ScoreOutcome>> {
    let runs = [
        (
            "WER on original hypothesis",
            &reference.original_words,
            &hypothesis.original_words,
            ".original.wer",
        ),
        (
            "WER on additionally-normalized hypothesis",
            &reference.normalized_words,
            &hypothesis.normalized_words,
            ".normalized.wer",
        ),
        (
            "CER on original hypothesis",
            &reference.original_chars,
            &hypothesis.original_chars,
            ".original.cer",
        ),
        (
            "CER on additionally-normalized hypothesis",
            &reference.normalized_chars,
            &hypothesis.normalized_chars,
            ".normalized.cer",
        ),
    ];

    let mut outcomes = Vec::with_capacity(runs.len());
    for (label, ref_file, hyp_file, report_suffix) in runs {
        let report = append_suffix(work_prefix, report_suffix);
        let summary = scorer.score(ref_file, hyp_file, &report)?;
        if summary.is_none() {
            warn!("No usable summary line in {}", report.display());
        }
        outcomes.push(ScoreOutcome {
            label: label.to_string(),
            summary,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_arabic_digits_and_space() {
        let preparer = TextPreparer::new().unwrap();

        assert_eq!(preparer.normalize("abc ابة"), " ابه");
        assert_eq!(preparer.normalize("رقم 42!"), "رقم 42");
    }

    #[test]
    fn test_normalize_folds_letter_variants() {
        let preparer = TextPreparer::new().unwrap();

        assert_eq!(preparer.normalize("ةىأإآ"), "هيااا");
        assert_eq!(preparer.normalize("مدرسة"), "مدرسه");
    }

    #[test]
    fn test_spaced_chars_renders_word_boundaries() {
        assert_eq!(spaced_chars("ab c"), "a b ▁ c");
        assert_eq!(spaced_chars(""), "");
    }

    #[test]
    fn test_prepare_writes_four_tagged_corpora() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hyp.txt");
        std::fs::write(&input, "ابة xyz\nثاني\n").unwrap();

        let preparer = TextPreparer::new().unwrap();
        let corpus = preparer.prepare(&input, &dir.path().join("work.hyp")).unwrap();

        let original = std::fs::read_to_string(&corpus.original_words).unwrap();
        assert_eq!(original, "ابة xyz (spk_0)\nثاني (spk_1)\n");

        let normalized = std::fs::read_to_string(&corpus.normalized_words).unwrap();
        assert_eq!(normalized, "ابه  (spk_0)\nثاني (spk_1)\n");

        let chars = std::fs::read_to_string(&corpus.original_chars).unwrap();
        assert!(chars.starts_with("ا ب ة ▁ x y z (spk_0)\n"));
    }

    struct FakeScorer {
        summary: Option<ScoreSummary>,
    }

    impl Scorer for FakeScorer {
        fn score(
            &self,
            _reference: &Path,
            _hypothesis: &Path,
            report: &Path,
        ) -> anyhow::Result<Option<ScoreSummary>> {
            std::fs::write(report, "fake report")?;
            Ok(self.summary.clone())
        }
    }

    #[test]
    fn test_score_corpora_runs_all_four_combinations() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("text.txt");
        std::fs::write(&input, "ابة\n").unwrap();

        let preparer = TextPreparer::new().unwrap();
        let reference = preparer.prepare(&input, &dir.path().join("work.ref")).unwrap();
        let hypothesis = preparer.prepare(&input, &dir.path().join("work.hyp")).unwrap();

        let scorer = FakeScorer {
            summary: Some(ScoreSummary {
                token_count: "12317".to_string(),
                error_rate: "51.5".to_string(),
            }),
        };
        let outcomes =
            score_corpora(&scorer, &reference, &hypothesis, &dir.path().join("work")).unwrap();

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].label, "WER on original hypothesis");
        assert_eq!(outcomes[3].label, "CER on additionally-normalized hypothesis");
        assert!(outcomes.iter().all(|o| o.summary.is_some()));
        assert!(dir.path().join("work.normalized.cer").exists());
    }

    #[test]
    fn test_missing_summary_is_soft() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("text.txt");
        std::fs::write(&input, "ابة\n").unwrap();

        let preparer = TextPreparer::new().unwrap();
        let reference = preparer.prepare(&input, &dir.path().join("work.ref")).unwrap();
        let hypothesis = preparer.prepare(&input, &dir.path().join("work.hyp")).unwrap();

        let scorer = FakeScorer { summary: None };
        let outcomes =
            score_corpora(&scorer, &reference, &hypothesis, &dir.path().join("work")).unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.summary.is_none()));
    }
}
