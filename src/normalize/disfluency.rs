use regex::Regex;

use crate::normalize::TextNormalizer;

/// Rule set for English translation text.
///
/// Strips the markup carried over from the transcripts: `(( ))` uncertain
/// spans, `#` foreign words, `+` mispronunciations, `=` typographical
/// errors, quotes and clause punctuation. The survivors are lower-cased.
#[derive(Debug)]
pub struct DisfluencyNormalizer {
    markup_regex: Regex,
}

impl DisfluencyNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let markup_regex = Regex::new(r#"[()#+=?!;.,":]"#)?;

        Ok(Self { markup_regex })
    }
}

impl TextNormalizer for DisfluencyNormalizer {
    fn normalize(&self, text: &str) -> String {
        self.markup_regex.replace_all(text, "").to_lowercase()
    }

    fn name(&self) -> &'static str {
        "DisfluencyNormalizer"
    }
}
