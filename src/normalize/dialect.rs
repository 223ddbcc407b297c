use regex::Regex;

use crate::normalize::TextNormalizer;

/// Rule set for dialectal Arabic transcripts.
///
/// Transcribers flag words with slash-terminated sigils: `O/` foreign,
/// `U/` uncertain, `M/` MSA, and combinations such as `UM/` or `UO/`.
/// Those sigils are stripped together with sentence-terminal punctuation
/// (including the Arabic question mark). Case is left unchanged.
#[derive(Debug)]
pub struct DialectNormalizer {
    marker_regex: Regex,
}

impl DialectNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let marker_regex = Regex::new(r"[OUM]+/*|[\u{061F}?!.]")?;

        Ok(Self { marker_regex })
    }
}

impl TextNormalizer for DialectNormalizer {
    fn normalize(&self, text: &str) -> String {
        self.marker_regex.replace_all(text, "").into_owned()
    }

    fn name(&self) -> &'static str {
        "DialectNormalizer"
    }
}
