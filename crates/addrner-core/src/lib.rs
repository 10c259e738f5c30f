//! # Addrner Core
//!
//! Corpus tooling for US address named-entity recognition: the nerf
//! annotation format, the binary document container, conversion of the
//! legacy XML training corpus, and an evaluation harness that reports
//! mispredicted documents.
//!
//! ## Quick Start
//!
//! ```rust
//! use addrner_core::{BlankTokenizer, DocSpec, Label};
//!
//! let spec: DocSpec = serde_json::from_str(
//!     r#"{"text": "123 Main St", "ents": [{"text": "Main", "label": "StreetName"}]}"#,
//! ).unwrap();
//!
//! let doc = spec.to_document(&BlankTokenizer::new()).unwrap();
//! assert_eq!(doc.labels(), [Label::StreetName]);
//! assert_eq!(doc.span_text(&doc.ents()[0]), "Main");
//! ```
pub mod doc;
pub mod error;
pub mod eval;
pub mod labels;
pub mod model;
pub mod nerf;
pub mod xml;

use std::fs;
use std::io::Write;
use std::path::Path;

// Re-export primary API
pub use doc::{BlankTokenizer, DocBin, Document, Span, Token, Tokenizer, blank};
pub use error::{AddrnerError, Result};
pub use eval::{EvalConfig, EvalSummary, Example};
pub use labels::Label;
pub use model::{EntityRecognizer, LexiconModel};
pub use nerf::{DocSpec, EntSpec, Format, convert_format};

/// Replaces the file at `path` with `bytes`.
///
/// Writes go to a temporary file in the destination directory which is then
/// renamed over `path`, so readers never see a partial file. Missing parent
/// directories are created.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
