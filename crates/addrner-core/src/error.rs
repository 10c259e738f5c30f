use std::path::PathBuf;

use thiserror::Error;

use crate::nerf::Format;

/// Errors that can occur while reading, converting or evaluating corpora.
#[derive(Debug, Error)]
pub enum AddrnerError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be produced or consumed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A nerf file is not valid JSON or does not have the expected shape.
    #[error("invalid nerf file {path}: {source}")]
    NerfParse {
        /// The offending file.
        path: PathBuf,
        /// Underlying error, including the JSON path of the bad value.
        source: serde_path_to_error::Error<serde_json::Error>,
    },

    /// The legacy XML corpus is not well formed.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A label string is not part of the registry.
    #[error("unknown label: {0:?}")]
    UnknownLabel(String),

    /// A format name is neither `nerf` nor `spacy`.
    #[error("invalid {role} format: {format:?}")]
    UnknownFormat {
        /// `"input"` or `"output"`.
        role: &'static str,
        /// The rejected format name.
        format: String,
    },

    /// The requested direction is not one of the two supported conversions.
    #[error("cannot convert from {from} to {to}")]
    UnsupportedConversion {
        /// Source format.
        from: Format,
        /// Target format.
        to: Format,
    },

    /// An entity without offsets does not occur in its document.
    #[error("entity text {text:?} not found in document")]
    TextNotFound {
        /// The entity text.
        text: String,
    },

    /// An entity without offsets occurs several times in its document.
    #[error("entity text {text:?} occurs {occurrences} times; start and end are required")]
    AmbiguousText {
        /// The entity text.
        text: String,
        /// Number of non-overlapping occurrences.
        occurrences: usize,
    },

    /// Stored offsets fall outside the document.
    #[error("offsets {start}..{end} out of range for document of {len} characters")]
    OffsetOutOfRange {
        /// Start character offset.
        start: usize,
        /// End character offset.
        end: usize,
        /// Document length in characters.
        len: usize,
    },

    /// Stored offsets do not select the entity text.
    #[error("offsets {start}..{end} select {found:?}, expected {expected:?}")]
    OffsetMismatch {
        /// Start character offset.
        start: usize,
        /// End character offset.
        end: usize,
        /// The entity text.
        expected: String,
        /// The text actually found at those offsets.
        found: String,
    },

    /// A span does not start and end on token boundaries.
    #[error("span {start}..{end} ({text:?}) is not aligned to token boundaries")]
    Misaligned {
        /// Start byte offset.
        start: usize,
        /// End byte offset.
        end: usize,
        /// The text covered by the span.
        text: String,
    },

    /// Two entity spans share at least one token.
    #[error("entity spans {first:?} and {second:?} overlap")]
    OverlappingSpans {
        /// Byte range of the span already on the document.
        first: (usize, usize),
        /// Byte range of the span being added.
        second: (usize, usize),
    },

    /// The binary container could not be encoded or decoded.
    #[error("binary container error: {0}")]
    Container(String),

    /// The binary container was written by an incompatible version.
    #[error("unsupported binary container version {found} (expected {expected})")]
    ContainerVersion {
        /// Version found in the payload.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },

    /// The evaluation report template failed to render.
    #[error("report rendering failed: {0}")]
    Report(#[from] askama::Error),

    /// No tokenizer exists for the requested language.
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    /// The model directory could not be loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// A record-level failure, tagged with the index of the record.
    #[error("document {index}: {source}")]
    InDocument {
        /// Zero-based position of the document in its corpus.
        index: usize,
        /// What went wrong.
        source: Box<AddrnerError>,
    },
}

impl AddrnerError {
    /// Attach the index of the document being processed.
    pub fn in_document(self, index: usize) -> Self {
        Self::InDocument {
            index,
            source: Box::new(self),
        }
    }
}

/// Result type alias for addrner operations.
pub type Result<T> = std::result::Result<T, AddrnerError>;
