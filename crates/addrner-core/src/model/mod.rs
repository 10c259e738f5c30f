//! # Recognizers
//!
//! A recognizer turns raw text into a document with predicted entities.
//! The evaluation harness only depends on [`EntityRecognizer`]; the
//! lexicon model is the backend shipped with this crate.

pub mod lexicon;

pub use lexicon::{LEXICON_FILE, LexiconModel};

use crate::doc::{Document, Tokenizer};
use crate::error::Result;

/// Entity prediction capability.
pub trait EntityRecognizer {
    /// The tokenizer the model segments text with.
    fn tokenizer(&self) -> &dyn Tokenizer;

    /// Predicts entities for `text`.
    fn recognize(&self, text: &str) -> Result<Document>;
}
