//! Corpus preparation and scoring utilities for a dialectal Arabic speech
//! transcription/translation distribution.
//!
//! The library backs four standalone batch binaries: `prepare-stm`,
//! `subselect-stm`, `filter-segments` and `wer-cer`. Each is a one-shot,
//! synchronous pass from input paths to output paths with no cross-run state.

pub mod config;
pub mod normalize;
pub mod scoring;
pub mod segments;
pub mod stm;
