//! Bad-segment filtering of row-aligned decoder output.
//!
//! The shipped segment index contains a handful of segments with zero
//! duration or no speech. Decoders that consumed the full index produce one
//! output row per index line, so the fix is positional: find the index line
//! numbers matching the known-bad descriptors, then drop the same line
//! numbers from the aligned output file.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Segment descriptor lines known to be bad in the shipped index
/// (zero duration or no speech).
pub const BAD_SEGMENTS: [&str; 5] = [
    "20170606_000110_13802_A_008209-008322 20170606_000110_13802_A 82.098 83.220",
    "20170606_000110_13802_A_010606-010757 20170606_000110_13802_A 106.060 107.570",
    "20170606_000110_13802_B_039745-039907 20170606_000110_13802_B 397.450 399.078",
    "20170606_000110_13802_B_053041-053104 20170606_000110_13802_B 530.410 531.040",
    "20170907_204736_16787_A_040194-040194 20170907_204736_16787_A 401.944 401.944",
];

/// Survivor count expected after filtering the shipped 4293-line index.
pub const EXPECTED_SURVIVORS: usize = 4288;

/// Filter a decoder output aligned with the shipped segment index, then
/// assert the hardcoded survivor count. Any mismatch means the two files
/// were not line-aligned and the output cannot be trusted.
pub fn filter_bad_segments(segments_path: &Path, input: &Path, output: &Path) -> Result<()> {
    let bad_lines = bad_line_numbers(segments_path, &BAD_SEGMENTS)?;
    let survivors = filter_aligned_file(input, output, &bad_lines)?;

    if survivors != EXPECTED_SURVIVORS {
        bail!(
            "Expected {EXPECTED_SURVIVORS} surviving lines, got {survivors}; \
             is {} aligned with the segment index?",
            input.display()
        );
    }

    info!(
        "Filtered {} -> {}: {} surviving lines",
        input.display(),
        output.display(),
        survivors
    );
    Ok(())
}

/// 0-based line numbers of the index whose content matches a blocked
/// descriptor exactly.
pub fn bad_line_numbers(segments_path: &Path, blocklist: &[&str]) -> Result<HashSet<usize>> {
    let blocked: HashSet<&str> = blocklist.iter().copied().collect();
    let content = std::fs::read_to_string(segments_path)
        .with_context(|| format!("Failed to read segment index {}", segments_path.display()))?;

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| blocked.contains(line.trim_end()))
        .map(|(number, _)| number)
        .collect())
}

/// Copy `input` to `output`, dropping the given 0-based line numbers.
/// Returns the survivor count; every skipped line is reported.
pub fn filter_aligned_file(
    input: &Path,
    output: &Path,
    bad_lines: &HashSet<usize>,
) -> Result<usize> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);

    let mut survivors = 0usize;
    for (number, line) in content.lines().enumerate() {
        if bad_lines.contains(&number) {
            warn!("Skip line {number}: {line}");
        } else {
            writeln!(out, "{line}")?;
            survivors += 1;
        }
    }

    out.flush()?;
    Ok(survivors)
}
