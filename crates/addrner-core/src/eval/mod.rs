//! # Evaluation Harness
//!
//! Runs a recognizer over a labelled set and reports the documents whose
//! predicted label sequence differs from the reference.

pub mod render;

pub use render::render_html;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::doc::{DocBin, Document};
use crate::error::Result;
use crate::model::{EntityRecognizer, LexiconModel};

/// A reference document paired with the model's prediction for its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// The annotated document from the evaluation set.
    pub reference: Document,
    /// The model's output for the same text.
    pub predicted: Document,
}

impl Example {
    /// Returns `true` if the predicted label sequence differs from the
    /// reference, in label, count or order.
    pub fn is_misprediction(&self) -> bool {
        is_misprediction(self)
    }
}

/// Returns `true` if the example's label sequences differ.
pub fn is_misprediction(example: &Example) -> bool {
    let reference = example.reference.ents().iter().map(|span| span.label);
    let predicted = example.predicted.ents().iter().map(|span| span.label);
    !reference.eq(predicted)
}

/// Predicts every document of `docbin` with `model`.
///
/// Reference documents are segmented with the model's own tokenizer.
pub fn load_examples(model: &dyn EntityRecognizer, docbin: &DocBin) -> Result<Vec<Example>> {
    let references = docbin.get_docs(model.tokenizer())?;
    references
        .into_iter()
        .enumerate()
        .map(|(index, reference)| {
            let predicted = model
                .recognize(reference.text())
                .map_err(|e| e.in_document(index))?;
            debug!(index, ents = predicted.ents().len(), "predicted document");
            Ok(Example {
                reference,
                predicted,
            })
        })
        .collect()
}

/// The mispredicted examples with their position in the evaluation set.
pub fn mispredictions(examples: &[Example]) -> impl Iterator<Item = (usize, &Example)> {
    examples
        .iter()
        .enumerate()
        .filter(|(_, example)| example.is_misprediction())
}

/// Where the evaluation harness reads its inputs and writes its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Model directory.
    pub model_dir: PathBuf,
    /// Labelled evaluation set (binary container).
    pub dev_set: PathBuf,
    /// HTML report destination.
    pub output: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./models/sm/training/model-last"),
            dev_set: PathBuf::from("./data/dev.spacy"),
            output: PathBuf::from("eval.html"),
        }
    }
}

impl EvalConfig {
    /// Create a new configuration with default paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model directory.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Set the evaluation set.
    pub fn with_dev_set(mut self, path: impl Into<PathBuf>) -> Self {
        self.dev_set = path.into();
        self
    }

    /// Set the report destination.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }
}

/// Counts from one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalSummary {
    /// Documents evaluated.
    pub total: usize,
    /// Documents whose label sequence was wrong.
    pub mispredicted: usize,
}

/// Loads the model and evaluation set named by `config`, and writes the
/// misprediction report.
pub fn run(config: &EvalConfig) -> Result<EvalSummary> {
    let model = LexiconModel::load(&config.model_dir)?;
    let docbin = DocBin::from_disk(&config.dev_set)?;
    evaluate(&model, &docbin, config)
}

/// Evaluates `model` on `docbin` and writes the report to `config.output`.
pub fn evaluate(
    model: &dyn EntityRecognizer,
    docbin: &DocBin,
    config: &EvalConfig,
) -> Result<EvalSummary> {
    let examples = load_examples(model, docbin)?;
    let summary = EvalSummary {
        total: examples.len(),
        mispredicted: mispredictions(&examples).count(),
    };

    let html = render_html(&examples)?;
    crate::write_atomic(&config.output, html.as_bytes())?;
    info!(
        total = summary.total,
        mispredicted = summary.mispredicted,
        report = %config.output.display(),
        "evaluation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{BlankTokenizer, Tokenizer};
    use crate::labels::Label;

    fn annotated(text: &str, ents: &[(usize, usize, Label)]) -> Document {
        let mut doc = BlankTokenizer::new().make_doc(text);
        for &(start, end, label) in ents {
            doc.add_ent(doc.char_span(start, end, label).unwrap()).unwrap();
        }
        doc
    }

    fn example(reference: &[(usize, usize, Label)], predicted: &[(usize, usize, Label)]) -> Example {
        Example {
            reference: annotated("123 Main St", reference),
            predicted: annotated("123 Main St", predicted),
        }
    }

    const NUM: (usize, usize, Label) = (0, 3, Label::AddressNumber);
    const NAME: (usize, usize, Label) = (4, 8, Label::StreetName);
    const TYPE: (usize, usize, Label) = (9, 11, Label::StreetNamePostType);

    #[test]
    fn test_identical_sequence_is_not_misprediction() {
        assert!(!example(&[NUM, NAME, TYPE], &[NUM, NAME, TYPE]).is_misprediction());
        assert!(!example(&[], &[]).is_misprediction());
    }

    #[test]
    fn test_same_labels_different_boundaries_is_not_misprediction() {
        let wide_name = (4, 11, Label::StreetName);
        assert!(!example(&[NAME], &[wide_name]).is_misprediction());
    }

    #[test]
    fn test_label_value_count_and_order() {
        let wrong_label = (4, 8, Label::PlaceName);
        assert!(example(&[NUM, NAME], &[NUM, wrong_label]).is_misprediction());
        assert!(example(&[NUM, NAME, TYPE], &[NUM, NAME]).is_misprediction());

        let swapped_num = (0, 3, Label::StreetName);
        let swapped_name = (4, 8, Label::AddressNumber);
        assert!(example(&[NUM, NAME], &[swapped_num, swapped_name]).is_misprediction());
    }

    #[test]
    fn test_mispredictions_keeps_indices() {
        let examples = vec![
            example(&[NUM], &[NUM]),
            example(&[NUM], &[]),
            example(&[NAME], &[NAME]),
            example(&[NAME], &[TYPE]),
        ];
        let indices: Vec<_> = mispredictions(&examples).map(|(i, _)| i).collect();
        assert_eq!(indices, [1, 3]);
    }

    #[test]
    fn test_load_examples_pairs_documents() {
        let train = [annotated("123 Main St", &[NUM, NAME, TYPE])];
        let model = LexiconModel::fit(&train);
        let docbin: DocBin = [annotated("123 Main Ave", &[NUM, NAME, (9, 12, Label::StreetNamePostType)])]
            .iter()
            .collect();

        let examples = load_examples(&model, &docbin).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].predicted.text(), "123 Main Ave");
        assert_eq!(
            examples[0].predicted.labels(),
            [Label::AddressNumber, Label::StreetName]
        );
        assert!(examples[0].is_misprediction());
    }

    #[test]
    fn test_config_builder() {
        let config = EvalConfig::new()
            .with_model_dir("models/lg")
            .with_dev_set("dev.spacy")
            .with_output("out/report.html");
        assert_eq!(config.model_dir, PathBuf::from("models/lg"));
        assert_eq!(config.dev_set, PathBuf::from("dev.spacy"));
        assert_eq!(config.output, PathBuf::from("out/report.html"));
        assert_eq!(
            EvalConfig::default().model_dir,
            PathBuf::from("./models/sm/training/model-last")
        );
    }
}
