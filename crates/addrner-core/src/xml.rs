//! # Legacy XML Corpus
//!
//! Converts the usaddress training XML into binary containers. The raw
//! data looks like:
//!
//! ```xml
//! <AddressCollection>
//!   <AddressString><AddressNumber>8128</AddressNumber> <StreetNamePreDirectional>S.</StreetNamePreDirectional> <StreetName>DR</StreetName> <StreetName>MARTIN</StreetName> <StreetNamePostType>Drive</StreetNamePostType></AddressString>
//! </AddressCollection>
//! ```
//!
//! Each child of the root is one document; each child of a document is one
//! token whose tag names its label.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::doc::{DocBin, Document, Tokenizer};
use crate::error::{AddrnerError, Result};
use crate::labels::Label;

/// One labelled token of a legacy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlToken {
    /// Token text with surrounding whitespace removed.
    pub text: String,
    /// Label taken from the element tag.
    pub label: Label,
}

impl XmlToken {
    /// Creates a token from its text and label.
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// A run of same-label tokens, with byte offsets into the joined text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSpan {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset, with any trailing comma left out.
    pub end: usize,
    /// Label shared by the merged tokens.
    pub label: Label,
}

/// Reads a legacy XML corpus file.
pub fn parse_legacy_xml(path: &Path) -> Result<Vec<Vec<XmlToken>>> {
    let xml = fs::read_to_string(path)?;
    parse_legacy_xml_str(&xml)
}

/// Parses a legacy XML corpus into one token list per document.
///
/// Token text is trimmed since the raw data has stray whitespace the
/// tokenizer cannot align. Tokens that are empty after trimming are
/// dropped.
pub fn parse_legacy_xml_str(xml: &str) -> Result<Vec<Vec<XmlToken>>> {
    let tree = roxmltree::Document::parse(xml)?;
    let mut documents = Vec::new();

    for (index, node) in tree
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .enumerate()
    {
        let mut tokens = Vec::new();
        for child in node.children().filter(|n| n.is_element()) {
            let label: Label = child
                .tag_name()
                .name()
                .parse()
                .map_err(|e: AddrnerError| e.in_document(index))?;
            let text = child.text().unwrap_or_default().trim();
            if text.is_empty() {
                warn!(index, %label, "dropping empty token");
                continue;
            }
            tokens.push(XmlToken::new(text, label));
        }
        documents.push(tokens);
    }

    Ok(documents)
}

/// Joins token texts with single spaces, the way documents are built.
pub fn joined_text(tokens: &[XmlToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merges consecutive tokens sharing a label into single spans.
///
/// Offsets refer to [`joined_text`]. A trailing comma on a merged run is
/// left out of its span; runs that are only a comma produce no span.
pub fn merge_adjacent_labels(tokens: &[XmlToken]) -> Vec<MergedSpan> {
    let mut spans = Vec::new();
    let mut start = 0;

    for run in tokens.chunk_by(|a, b| a.label == b.label) {
        let len = run.iter().map(|t| t.text.len()).sum::<usize>() + run.len() - 1;
        let span_len = match run.last() {
            Some(last) if last.text.ends_with(',') => len - 1,
            _ => len,
        };
        if span_len > 0 {
            spans.push(MergedSpan {
                start,
                end: start + span_len,
                label: run[0].label,
            });
        }
        start += len + 1;
    }

    spans
}

/// Builds an annotated document from legacy tokens.
///
/// # Errors
///
/// `AddrnerError::Misaligned` if a merged span does not fall on token
/// boundaries of `tokenizer`'s segmentation.
pub fn tokens_to_document(tokens: &[XmlToken], tokenizer: &dyn Tokenizer) -> Result<Document> {
    let mut doc = tokenizer.make_doc(&joined_text(tokens));
    for span in merge_adjacent_labels(tokens) {
        let span = doc.aligned_span(span.start, span.end, span.label)?;
        doc.add_ent(span)?;
    }
    Ok(doc)
}

/// Converts a legacy XML corpus file into a binary container file.
///
/// Missing output directories are created. Returns the number of
/// documents written.
pub fn convert_corpus(input: &Path, output: &Path, tokenizer: &dyn Tokenizer) -> Result<usize> {
    let token_lists = parse_legacy_xml(input)?;
    let mut docbin = DocBin::new();
    for (index, tokens) in token_lists.iter().enumerate() {
        let doc = tokens_to_document(tokens, tokenizer).map_err(|e| e.in_document(index))?;
        docbin.add(&doc);
    }
    docbin.to_disk(output)?;
    info!(input = %input.display(), docs = docbin.len(), "converted legacy corpus");
    Ok(docbin.len())
}
