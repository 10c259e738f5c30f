//! # Binary Document Container
//!
//! A compact on-disk collection of annotated documents. The payload is CBOR
//! compressed with gzip. Only text and entity spans are stored; tokens are
//! rebuilt on load by whichever tokenizer the caller supplies.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use minicbor::{Decode, Encode};
use tracing::{debug, info};

use crate::doc::{Document, Tokenizer};
use crate::error::{AddrnerError, Result};
use crate::labels::Label;

/// Payload version written by this build.
pub const DOCBIN_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct StoredEnt {
    #[n(0)]
    start: u64,
    #[n(1)]
    end: u64,
    #[n(2)]
    label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct StoredDoc {
    #[n(0)]
    text: String,
    #[n(1)]
    ents: Vec<StoredEnt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct Payload {
    #[n(0)]
    version: u32,
    #[n(1)]
    docs: Vec<StoredDoc>,
}

/// An ordered collection of annotated documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBin {
    docs: Vec<StoredDoc>,
}

impl DocBin {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document with its entities.
    pub fn add(&mut self, doc: &Document) {
        let ents = doc
            .ents()
            .iter()
            .map(|span| StoredEnt {
                start: span.start as u64,
                end: span.end as u64,
                label: span.label.as_str().to_string(),
            })
            .collect();
        self.docs.push(StoredDoc {
            text: doc.text().to_string(),
            ents,
        });
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns `true` if the container holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Rebuilds the documents, segmenting each text with `tokenizer`.
    ///
    /// # Errors
    ///
    /// Fails on the first document whose stored spans are not valid for
    /// the tokenizer's segmentation; the error carries the document index.
    pub fn get_docs(&self, tokenizer: &dyn Tokenizer) -> Result<Vec<Document>> {
        self.docs
            .iter()
            .enumerate()
            .map(|(index, stored)| {
                Self::restore(stored, tokenizer).map_err(|e| e.in_document(index))
            })
            .collect()
    }

    fn restore(stored: &StoredDoc, tokenizer: &dyn Tokenizer) -> Result<Document> {
        let mut doc = tokenizer.make_doc(&stored.text);
        for ent in &stored.ents {
            let label: Label = ent.label.parse()?;
            let start = to_offset(ent.start)?;
            let end = to_offset(ent.end)?;
            let span = doc.aligned_span(start, end, label)?;
            doc.add_ent(span)?;
        }
        Ok(doc)
    }

    /// Serializes the container to compressed bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = Payload {
            version: DOCBIN_VERSION,
            docs: self.docs.clone(),
        };
        let cbor = minicbor::to_vec(&payload).map_err(|e| AddrnerError::Container(e.to_string()))?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&cbor)?;
        Ok(encoder.finish()?)
    }

    /// Deserializes a container produced by [`DocBin::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cbor = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut cbor)
            .map_err(|e| AddrnerError::Container(format!("decompression failed: {e}")))?;

        let payload: Payload =
            minicbor::decode(&cbor).map_err(|e| AddrnerError::Container(e.to_string()))?;
        if payload.version != DOCBIN_VERSION {
            return Err(AddrnerError::ContainerVersion {
                found: payload.version,
                expected: DOCBIN_VERSION,
            });
        }
        Ok(Self { docs: payload.docs })
    }

    /// Writes the container to `path`, creating parent directories.
    ///
    /// The file is replaced atomically, so a failed write leaves no
    /// partial output behind.
    pub fn to_disk(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        crate::write_atomic(path, &bytes)?;
        info!(path = %path.display(), docs = self.len(), "wrote binary container");
        Ok(())
    }

    /// Reads a container from `path`.
    pub fn from_disk(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let docbin = Self::from_bytes(&bytes)?;
        debug!(path = %path.display(), docs = docbin.len(), "read binary container");
        Ok(docbin)
    }
}

impl<'a> FromIterator<&'a Document> for DocBin {
    fn from_iter<I: IntoIterator<Item = &'a Document>>(iter: I) -> Self {
        let mut docbin = DocBin::new();
        for doc in iter {
            docbin.add(doc);
        }
        docbin
    }
}

fn to_offset(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| AddrnerError::Container(format!("offset {value} too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::BlankTokenizer;

    fn annotated(text: &str, ents: &[(usize, usize, Label)]) -> Document {
        let mut doc = BlankTokenizer::new().make_doc(text);
        for &(start, end, label) in ents {
            let span = doc.char_span(start, end, label).unwrap();
            doc.add_ent(span).unwrap();
        }
        doc
    }

    #[test]
    fn test_bytes_roundtrip() {
        let docs = vec![
            annotated(
                "123 Main St",
                &[(0, 3, Label::AddressNumber), (4, 8, Label::StreetName)],
            ),
            annotated("PO Box 9", &[]),
        ];
        let docbin: DocBin = docs.iter().collect();
        let bytes = docbin.to_bytes().unwrap();
        let restored = DocBin::from_bytes(&bytes).unwrap();
        assert_eq!(restored, docbin);

        let restored_docs = restored.get_docs(&BlankTokenizer::new()).unwrap();
        assert_eq!(restored_docs, docs);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = DocBin::from_bytes(b"not a container").unwrap_err();
        assert!(matches!(err, AddrnerError::Container(_)));
    }

    #[test]
    fn test_rejects_other_version() {
        let payload = Payload {
            version: DOCBIN_VERSION + 1,
            docs: Vec::new(),
        };
        let cbor = minicbor::to_vec(&payload).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&cbor).unwrap();
        let bytes = encoder.finish().unwrap();

        assert!(matches!(
            DocBin::from_bytes(&bytes),
            Err(AddrnerError::ContainerVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_get_docs_reports_index() {
        let mut docbin = DocBin::new();
        docbin.add(&annotated("1 Elm", &[]));
        docbin.docs.push(StoredDoc {
            text: "2 Oak".into(),
            ents: vec![StoredEnt {
                start: 0,
                end: 1,
                label: "Street".into(),
            }],
        });

        let err = docbin.get_docs(&BlankTokenizer::new()).unwrap_err();
        assert!(matches!(err, AddrnerError::InDocument { index: 1, .. }));
    }
}
