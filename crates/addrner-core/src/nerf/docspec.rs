use serde::{Deserialize, Serialize};

use crate::doc::{Document, Tokenizer};
use crate::error::Result;
use crate::nerf::EntSpec;

/// One annotated document in nerf form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSpec {
    /// Full raw document text.
    pub text: String,
    /// Entities, in file order.
    pub ents: Vec<EntSpec>,
}

impl DocSpec {
    /// Creates a spec from text and entities.
    pub fn new(text: impl Into<String>, ents: Vec<EntSpec>) -> Self {
        Self {
            text: text.into(),
            ents,
        }
    }

    /// Tokenizes the text and attaches every entity.
    ///
    /// # Errors
    ///
    /// Fails if an entity cannot be located, is not token aligned, or
    /// overlaps an entity attached before it.
    pub fn to_document(&self, tokenizer: &dyn Tokenizer) -> Result<Document> {
        let mut doc = tokenizer.make_doc(&self.text);
        for ent in &self.ents {
            let span = ent.to_span(&doc)?;
            doc.add_ent(span)?;
        }
        Ok(doc)
    }

    /// Describes every entity of an annotated document, in document order.
    pub fn from_document(doc: &Document) -> Self {
        let ents = doc
            .ents()
            .iter()
            .map(|span| EntSpec::from_doc_span(doc, span))
            .collect();
        Self::new(doc.text(), ents)
    }

    /// The nerf dictionary form of this document.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "text": self.text,
            "ents": self.ents.iter().map(EntSpec::to_dict).collect::<Vec<_>>(),
        })
    }

    /// Parses the nerf dictionary form of a document.
    pub fn from_dict(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::BlankTokenizer;
    use crate::error::AddrnerError;
    use crate::labels::Label;
    use serde_json::json;

    fn sample() -> DocSpec {
        DocSpec::from_dict(json!({
            "text": "431 Marietta St NW Fl. 3",
            "ents": [
                {"text": "431", "label": "AddressNumber"},
                {"text": "Marietta", "label": "StreetName"},
                {"text": "St", "label": "StreetNamePostType"},
                {"text": "NW", "label": "StreetNamePostDirectional"},
                {"text": "Fl.", "label": "OccupancyType"},
                {"text": "3", "label": "OccupancyIdentifier", "start": 23, "end": 24}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_dict_roundtrip() {
        let spec = sample();
        assert_eq!(DocSpec::from_dict(spec.to_dict()).unwrap(), spec);
    }

    #[test]
    fn test_to_document() {
        let doc = sample().to_document(&BlankTokenizer::new()).unwrap();
        let ents: Vec<_> = doc
            .ents()
            .iter()
            .map(|span| (doc.span_text(span), span.label))
            .collect();
        assert_eq!(ents[0], ("431", Label::AddressNumber));
        assert_eq!(ents[4], ("Fl.", Label::OccupancyType));
        assert_eq!(ents[5], ("3", Label::OccupancyIdentifier));
    }

    #[test]
    fn test_document_roundtrip() {
        let spec = sample();
        let doc = spec.to_document(&BlankTokenizer::new()).unwrap();
        let back = DocSpec::from_document(&doc);
        // "3" also occurs inside "431", so it keeps its offsets
        assert_eq!(back, spec);
    }

    #[test]
    fn test_overlapping_repeat_roundtrip() {
        let tokenizer = BlankTokenizer::new();
        let mut doc = tokenizer.make_doc("1 1 1");
        doc.add_ent(doc.char_span(0, 1, Label::AddressNumber).unwrap())
            .unwrap();
        doc.add_ent(doc.char_span(2, 5, Label::StreetName).unwrap())
            .unwrap();

        let spec = DocSpec::from_document(&doc);
        assert_eq!(spec.ents[1].offsets(), Some((2, 5)));
        assert_eq!(spec.to_document(&tokenizer).unwrap(), doc);

        let mut street_only = tokenizer.make_doc("1 1 1");
        street_only
            .add_ent(street_only.char_span(2, 5, Label::StreetName).unwrap())
            .unwrap();
        let spec = DocSpec::from_document(&street_only);
        let back = spec.to_document(&tokenizer).unwrap();
        assert_eq!(back.ents()[0].start, 2);
        assert_eq!(back, street_only);
    }

    #[test]
    fn test_overlapping_entities_rejected() {
        let spec = DocSpec::new(
            "123 Main St",
            vec![
                EntSpec::ByUniqueText {
                    text: "Main St".into(),
                    label: Label::StreetName,
                },
                EntSpec::ByUniqueText {
                    text: "St".into(),
                    label: Label::StreetNamePostType,
                },
            ],
        );
        assert!(matches!(
            spec.to_document(&BlankTokenizer::new()),
            Err(AddrnerError::OverlappingSpans { .. })
        ));
    }

    #[test]
    fn test_misaligned_entity_rejected() {
        let spec = DocSpec::new(
            "123 Main St",
            vec![EntSpec::ByUniqueText {
                text: "ain".into(),
                label: Label::StreetName,
            }],
        );
        assert!(matches!(
            spec.to_document(&BlankTokenizer::new()),
            Err(AddrnerError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_missing_keys_rejected() {
        assert!(DocSpec::from_dict(json!({"text": "123 Main St"})).is_err());
        assert!(DocSpec::from_dict(json!({"ents": []})).is_err());
    }
}
