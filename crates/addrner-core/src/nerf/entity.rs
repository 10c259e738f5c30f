use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::doc::{Document, Span};
use crate::error::{AddrnerError, Result};
use crate::labels::Label;

/// Location of one entity inside a document.
///
/// Text that occurs exactly once in the document is located by the text
/// alone. Repeated text ("123 123rd St") carries explicit offsets.
///
/// Offsets are character offsets, as written in nerf files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnt", into = "RawEnt")]
pub enum EntSpec {
    /// Compact form: `text` occurs once in the document.
    ByUniqueText {
        /// The labelled substring.
        text: String,
        /// Entity label.
        label: Label,
    },
    /// Disambiguated form: `text` is the document text at `start..end`.
    ByOffset {
        /// The labelled substring.
        text: String,
        /// Entity label.
        label: Label,
        /// Start character offset.
        start: usize,
        /// End character offset.
        end: usize,
    },
}

/// The on-disk shape of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnt {
    text: String,
    label: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<usize>,
}

impl TryFrom<RawEnt> for EntSpec {
    type Error = String;

    fn try_from(raw: RawEnt) -> std::result::Result<Self, Self::Error> {
        match (raw.start, raw.end) {
            (None, None) => Ok(EntSpec::ByUniqueText {
                text: raw.text,
                label: raw.label,
            }),
            (Some(start), Some(end)) if start <= end => Ok(EntSpec::ByOffset {
                text: raw.text,
                label: raw.label,
                start,
                end,
            }),
            (Some(start), Some(end)) => Err(format!("start {start} is after end {end}")),
            _ => Err("start and end must be given together".to_string()),
        }
    }
}

impl From<EntSpec> for RawEnt {
    fn from(spec: EntSpec) -> Self {
        match spec {
            EntSpec::ByUniqueText { text, label } => RawEnt {
                text,
                label,
                start: None,
                end: None,
            },
            EntSpec::ByOffset {
                text,
                label,
                start,
                end,
            } => RawEnt {
                text,
                label,
                start: Some(start),
                end: Some(end),
            },
        }
    }
}

impl EntSpec {
    /// Describes the span `start..end` (character offsets) of `doc_text`.
    ///
    /// Offsets are kept only when the span text does not occur at exactly
    /// one position in the document.
    ///
    /// # Errors
    ///
    /// `AddrnerError::OffsetOutOfRange` if the offsets are reversed or
    /// past the end of the text.
    pub fn from_span(doc_text: &str, start: usize, end: usize, label: Label) -> Result<Self> {
        let out_of_range = || AddrnerError::OffsetOutOfRange {
            start,
            end,
            len: doc_text.chars().count(),
        };
        if start > end {
            return Err(out_of_range());
        }
        let byte_start = char_to_byte(doc_text, start).ok_or_else(out_of_range)?;
        let byte_end = char_to_byte(doc_text, end).ok_or_else(out_of_range)?;
        let text = doc_text.get(byte_start..byte_end).ok_or_else(out_of_range)?;
        Ok(Self::describe(doc_text, text, start, end, label))
    }

    /// Describes an entity span of `doc`.
    pub fn from_doc_span(doc: &Document, span: &Span) -> Self {
        let text = doc.span_text(span);
        let start = byte_to_char(doc.text(), span.start);
        let end = start + text.chars().count();
        Self::describe(doc.text(), text, start, end, span.label)
    }

    fn describe(doc_text: &str, text: &str, start: usize, end: usize, label: Label) -> Self {
        if occurrences(doc_text, text) == 1 {
            EntSpec::ByUniqueText {
                text: text.to_string(),
                label,
            }
        } else {
            EntSpec::ByOffset {
                text: text.to_string(),
                label,
                start,
                end,
            }
        }
    }

    /// The labelled text.
    pub fn text(&self) -> &str {
        match self {
            EntSpec::ByUniqueText { text, .. } | EntSpec::ByOffset { text, .. } => text,
        }
    }

    /// The entity label.
    pub fn label(&self) -> Label {
        match self {
            EntSpec::ByUniqueText { label, .. } | EntSpec::ByOffset { label, .. } => *label,
        }
    }

    /// Character offsets, if stored.
    pub fn offsets(&self) -> Option<(usize, usize)> {
        match self {
            EntSpec::ByUniqueText { .. } => None,
            EntSpec::ByOffset { start, end, .. } => Some((*start, *end)),
        }
    }

    /// Resolves this entity to a byte range of `doc_text`.
    ///
    /// # Errors
    ///
    /// * `TextNotFound` / `AmbiguousText` when locating by text fails.
    /// * `OffsetOutOfRange` / `OffsetMismatch` when stored offsets do not
    ///   select the entity text.
    pub fn resolve(&self, doc_text: &str) -> Result<Range<usize>> {
        match self {
            EntSpec::ByUniqueText { text, .. } => {
                match (occurrences(doc_text, text), doc_text.find(text.as_str())) {
                    (1, Some(start)) => Ok(start..start + text.len()),
                    (0, _) => Err(AddrnerError::TextNotFound { text: text.clone() }),
                    (occurrences, _) => Err(AddrnerError::AmbiguousText {
                        text: text.clone(),
                        occurrences,
                    }),
                }
            }
            EntSpec::ByOffset {
                text, start, end, ..
            } => {
                let out_of_range = || AddrnerError::OffsetOutOfRange {
                    start: *start,
                    end: *end,
                    len: doc_text.chars().count(),
                };
                let byte_start = char_to_byte(doc_text, *start).ok_or_else(out_of_range)?;
                let byte_end = char_to_byte(doc_text, *end).ok_or_else(out_of_range)?;
                let found = &doc_text[byte_start..byte_end];
                if found != text {
                    return Err(AddrnerError::OffsetMismatch {
                        start: *start,
                        end: *end,
                        expected: text.clone(),
                        found: found.to_string(),
                    });
                }
                Ok(byte_start..byte_end)
            }
        }
    }

    /// Resolves this entity to a token-aligned span of `doc`.
    pub fn to_span(&self, doc: &Document) -> Result<Span> {
        let range = self.resolve(doc.text())?;
        doc.aligned_span(range.start, range.end, self.label())
    }

    /// The nerf dictionary form of this entity.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::Value::Object(
            [
                Some(("text", serde_json::Value::from(self.text()))),
                Some(("label", serde_json::Value::from(self.label().as_str()))),
                self.offsets().map(|(s, _)| ("start", serde_json::Value::from(s))),
                self.offsets().map(|(_, e)| ("end", serde_json::Value::from(e))),
            ]
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }

    /// Parses the nerf dictionary form of an entity.
    pub fn from_dict(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Byte offset of the `idx`-th character, or the text length for
/// `idx == char count`.
fn char_to_byte(text: &str, idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .nth(idx)
}

fn byte_to_char(text: &str, byte: usize) -> usize {
    text.char_indices().take_while(|(b, _)| *b < byte).count()
}

/// Number of positions where `needle` starts in `text`, overlapping
/// matches included. Empty needles never match.
fn occurrences(text: &str, needle: &str) -> usize {
    let Some(first) = needle.chars().next() else {
        return 0;
    };
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = text[from..].find(needle) {
        count += 1;
        from += pos + first.len_utf8();
    }
    count
}
