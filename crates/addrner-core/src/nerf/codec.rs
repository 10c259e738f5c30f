//! Reading and writing nerf files, and conversion to and from the binary
//! container.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::doc::{BlankTokenizer, DocBin, Tokenizer};
use crate::error::{AddrnerError, Result};
use crate::nerf::DocSpec;

/// Corpus file formats understood by [`convert_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// nerf JSON annotation file.
    Nerf,
    /// Binary document container.
    Spacy,
}

impl Format {
    /// The format name, also used as file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Nerf => "nerf",
            Format::Spacy => "spacy",
        }
    }

    /// Parses a format name given for the `role` side of a conversion.
    fn parse_for(name: &str, role: &'static str) -> Result<Self> {
        match name {
            "nerf" => Ok(Format::Nerf),
            "spacy" => Ok(Format::Spacy),
            other => Err(AddrnerError::UnknownFormat {
                role,
                format: other.to_string(),
            }),
        }
    }

    /// Resolves an explicit format name, falling back to the extension of
    /// `path`.
    fn resolve(explicit: Option<&str>, path: &Path, role: &'static str) -> Result<Self> {
        let name = match explicit {
            Some(name) => name,
            None => path.extension().and_then(|ext| ext.to_str()).unwrap_or(""),
        };
        Self::parse_for(name, role)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes `specs` to `path` as pretty-printed JSON with a 2-space indent.
///
/// The whole file is replaced atomically.
pub fn write_nerf(specs: &[DocSpec], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(specs)?;
    crate::write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), docs = specs.len(), "wrote nerf file");
    Ok(())
}

/// Reads every document of a nerf file, in file order.
///
/// # Errors
///
/// `AddrnerError::NerfParse` if the file is not valid JSON or a record
/// lacks `text`/`ents`, has an unknown label, or gives only one offset.
pub fn read_nerf(path: &Path) -> Result<Vec<DocSpec>> {
    let json = fs::read_to_string(path)?;
    let specs = parse_nerf(&json).map_err(|source| AddrnerError::NerfParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), docs = specs.len(), "read nerf file");
    Ok(specs)
}

/// Parses nerf JSON text.
pub fn parse_nerf(
    json: &str,
) -> std::result::Result<Vec<DocSpec>, serde_path_to_error::Error<serde_json::Error>> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(deserializer)
}

/// Materializes every spec with `tokenizer` and packs them into a container.
///
/// # Errors
///
/// Stops at the first document that fails to materialize; the error
/// carries its index.
pub fn docspecs_to_docbin(specs: &[DocSpec], tokenizer: &dyn Tokenizer) -> Result<DocBin> {
    let mut docbin = DocBin::new();
    for (index, spec) in specs.iter().enumerate() {
        let doc = spec.to_document(tokenizer).map_err(|e| e.in_document(index))?;
        debug!(index, ents = doc.ents().len(), "packed document");
        docbin.add(&doc);
    }
    Ok(docbin)
}

/// Unpacks a container into specs.
///
/// Text is segmented by a fresh [`BlankTokenizer`], so no trained model is
/// involved.
pub fn docbin_to_docspecs(docbin: &DocBin) -> Result<Vec<DocSpec>> {
    let tokenizer = BlankTokenizer::new();
    let docs = docbin.get_docs(&tokenizer)?;
    Ok(docs.iter().map(DocSpec::from_document).collect())
}

/// Reads a nerf file into a container.
pub fn nerf_to_docbin(path: &Path) -> Result<DocBin> {
    let specs = read_nerf(path)?;
    docspecs_to_docbin(&specs, &BlankTokenizer::new())
}

/// Writes the contents of a container as a nerf file.
pub fn docbin_to_nerf(docbin: &DocBin, path: &Path) -> Result<()> {
    let specs = docbin_to_docspecs(docbin)?;
    write_nerf(&specs, path)
}

/// Converts between nerf and binary container files.
///
/// Formats are inferred from the file extensions when not given. Unknown
/// formats and same-format requests are rejected before any file is read
/// or written.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use addrner_core::{AddrnerError, nerf::convert_format};
///
/// let err = convert_format(Path::new("a.nerf"), Path::new("b.nerf"), None, None).unwrap_err();
/// assert!(matches!(err, AddrnerError::UnsupportedConversion { .. }));
/// ```
pub fn convert_format(
    input: &Path,
    output: &Path,
    input_format: Option<&str>,
    output_format: Option<&str>,
) -> Result<()> {
    let from = Format::resolve(input_format, input, "input")?;
    let to = Format::resolve(output_format, output, "output")?;

    match (from, to) {
        (Format::Spacy, Format::Nerf) => {
            let docbin = DocBin::from_disk(input)?;
            docbin_to_nerf(&docbin, output)
        }
        (Format::Nerf, Format::Spacy) => {
            let docbin = nerf_to_docbin(input)?;
            docbin.to_disk(output)
        }
        (from, to) => Err(AddrnerError::UnsupportedConversion { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(Format::parse_for("nerf", "input").unwrap(), Format::Nerf);
        assert_eq!(Format::parse_for("spacy", "output").unwrap(), Format::Spacy);
        assert!(matches!(
            Format::parse_for("json", "output"),
            Err(AddrnerError::UnknownFormat { role: "output", .. })
        ));
        assert_eq!(Format::Spacy.to_string(), "spacy");
    }

    #[test]
    fn test_format_from_extension() {
        let path = Path::new("data/train.spacy");
        assert_eq!(Format::resolve(None, path, "input").unwrap(), Format::Spacy);
        assert_eq!(
            Format::resolve(Some("nerf"), path, "input").unwrap(),
            Format::Nerf
        );
    }

    #[test]
    fn test_unknown_output_format() {
        let err = convert_format(Path::new("a.nerf"), Path::new("b.txt"), None, None).unwrap_err();
        assert!(matches!(
            err,
            AddrnerError::UnknownFormat { role: "output", ref format } if format == "txt"
        ));
    }

    #[test]
    fn test_missing_extension_is_unknown() {
        let err = convert_format(Path::new("corpus"), Path::new("b.nerf"), None, None).unwrap_err();
        assert!(matches!(
            err,
            AddrnerError::UnknownFormat { role: "input", ref format } if format.is_empty()
        ));
    }

    #[test]
    fn test_same_format_rejected() {
        let err = convert_format(
            Path::new("a.spacy"),
            Path::new("b.spacy"),
            None,
            Some("spacy"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AddrnerError::UnsupportedConversion {
                from: Format::Spacy,
                to: Format::Spacy
            }
        ));
    }

    #[test]
    fn test_parse_nerf_reports_path() {
        let err = parse_nerf(r#"[{"text": "1 Elm", "ents": [{"text": "1", "label": "Nope"}]}]"#)
            .unwrap_err();
        assert!(err.path().to_string().ends_with("ents[0].label"));
    }
}
