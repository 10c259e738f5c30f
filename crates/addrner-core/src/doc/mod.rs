//! Tokenized documents with entity spans, and their binary container.

pub mod docbin;
pub mod document;
pub mod tokenizer;

pub use docbin::DocBin;
pub use document::{Document, Span};
pub use tokenizer::{BlankTokenizer, Token, Tokenizer, blank};
