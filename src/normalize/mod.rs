//! Language-tagged transcript text normalization.
//!
//! Each supported language label selects a fixed rule set that strips the
//! transcriber annotation markup for that language. The rule sets are never
//! merged or composed; one is chosen per batch from the corpus label.

mod dialect;
mod disfluency;

pub use dialect::DialectNormalizer;
pub use disfluency::DisfluencyNormalizer;

use thiserror::Error;
use tracing::{debug, info};

/// Trait for stripping transcriber annotation markup from utterance text.
pub trait TextNormalizer {
    /// Normalize one utterance.
    fn normalize(&self, text: &str) -> String;

    /// Name of this rule set for logging.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("text normalization for {0} is not supported")]
    UnsupportedLanguage(String),
    #[error("invalid normalization pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Enum to hold the supported rule sets.
#[derive(Debug)]
pub enum Normalizer {
    Dialect(DialectNormalizer),
    Disfluency(DisfluencyNormalizer),
}

impl Normalizer {
    /// Create the rule set selected by a corpus language label.
    ///
    /// `<aeb>` transcripts carry dialect annotation sigils; `<eng>`
    /// translations carry disfluency and typo markup. Any other label is a
    /// configuration error.
    pub fn for_language(label: &str) -> Result<Self, NormalizeError> {
        match label {
            "<aeb>" => {
                info!("Using dialect annotation rules for {label}");
                Ok(Normalizer::Dialect(DialectNormalizer::new()?))
            }
            "<eng>" => {
                info!("Using disfluency markup rules for {label}");
                Ok(Normalizer::Disfluency(DisfluencyNormalizer::new()?))
            }
            other => Err(NormalizeError::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Run normalization using the selected rule set.
    pub fn run(&self, text: &str) -> String {
        match self {
            Normalizer::Dialect(n) => {
                debug!("Running {}", n.name());
                n.normalize(text)
            }
            Normalizer::Disfluency(n) => {
                debug!("Running {}", n.name());
                n.normalize(text)
            }
        }
    }
}
