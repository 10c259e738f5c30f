use crate::doc::Token;
use crate::error::{AddrnerError, Result};
use crate::labels::Label;

/// A labelled span over whole tokens of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset in the document text.
    pub start: usize,
    /// End byte offset in the document text.
    pub end: usize,
    /// Index of the first token.
    pub start_token: usize,
    /// Index one past the last token.
    pub end_token: usize,
    /// Entity label.
    pub label: Label,
}

/// A tokenized text with non-overlapping entity spans.
///
/// Entities are kept in positional order regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
    ents: Vec<Span>,
}

impl Document {
    /// Creates a document without entities.
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            tokens,
            ents: Vec::new(),
        }
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Entity spans in positional order.
    pub fn ents(&self) -> &[Span] {
        &self.ents
    }

    /// The text covered by `span`.
    pub fn span_text(&self, span: &Span) -> &str {
        &self.text[span.start..span.end]
    }

    /// Labels of all entities, in order.
    pub fn labels(&self) -> Vec<Label> {
        self.ents.iter().map(|span| span.label).collect()
    }

    /// Builds a span from byte offsets.
    ///
    /// Returns `None` unless `start` is the start of a token and `end` is
    /// the end of a token at or after it.
    pub fn char_span(&self, start: usize, end: usize, label: Label) -> Option<Span> {
        if start >= end {
            return None;
        }
        let start_token = self.tokens.iter().position(|t| t.start == start)?;
        let last_token = self.tokens[start_token..]
            .iter()
            .position(|t| t.end == end)
            .map(|offset| start_token + offset)?;
        Some(Span {
            start,
            end,
            start_token,
            end_token: last_token + 1,
            label,
        })
    }

    /// Like [`Document::char_span`] but reports misalignment as an error.
    pub fn aligned_span(&self, start: usize, end: usize, label: Label) -> Result<Span> {
        self.char_span(start, end, label)
            .ok_or_else(|| AddrnerError::Misaligned {
                start,
                end,
                text: self.text.get(start..end).unwrap_or_default().to_string(),
            })
    }

    /// Adds one entity, keeping entities sorted.
    ///
    /// # Errors
    ///
    /// Returns `AddrnerError::OverlappingSpans` if the span shares a token
    /// with an existing entity.
    pub fn add_ent(&mut self, span: Span) -> Result<()> {
        let pos = self.ents.partition_point(|e| e.start_token < span.start_token);
        let clash = [pos.checked_sub(1), Some(pos)]
            .into_iter()
            .flatten()
            .filter_map(|i| self.ents.get(i))
            .find(|e| e.start_token < span.end_token && span.start_token < e.end_token);
        if let Some(existing) = clash {
            return Err(AddrnerError::OverlappingSpans {
                first: (existing.start, existing.end),
                second: (span.start, span.end),
            });
        }
        self.ents.insert(pos, span);
        Ok(())
    }

    /// Replaces all entities.
    pub fn set_ents(&mut self, spans: impl IntoIterator<Item = Span>) -> Result<()> {
        self.ents.clear();
        for span in spans {
            self.add_ent(span)?;
        }
        Ok(())
    }
}
