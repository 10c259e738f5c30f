use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::doc::{BlankTokenizer, Document, Span, Tokenizer, blank};
use crate::error::{AddrnerError, Result};
use crate::labels::Label;
use crate::model::EntityRecognizer;

/// File name of the lexicon inside a model directory.
pub const LEXICON_FILE: &str = "lexicon.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LexiconFile {
    lang: String,
    entries: BTreeMap<String, Label>,
}

/// Token lookup recognizer.
///
/// Each token is labelled by looking up its lowercased text; runs of
/// tokens with the same label become one entity. Unknown tokens are left
/// unlabelled and break runs.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    lang: String,
    tokenizer: BlankTokenizer,
    entries: BTreeMap<String, Label>,
}

impl LexiconModel {
    /// Builds a model from annotated documents.
    ///
    /// Every token inside an entity votes for that entity's label. The
    /// label with the most votes wins; ties go to the label listed first
    /// in the registry.
    pub fn fit<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut votes: HashMap<String, BTreeMap<Label, usize>> = HashMap::new();
        for doc in docs {
            for span in doc.ents() {
                for token in &doc.tokens()[span.start_token..span.end_token] {
                    *votes
                        .entry(token.text.to_lowercase())
                        .or_default()
                        .entry(span.label)
                        .or_default() += 1;
                }
            }
        }

        let entries = votes
            .into_iter()
            .filter_map(|(text, counts)| {
                counts
                    .into_iter()
                    .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then(lb.cmp(la)))
                    .map(|(label, _)| (text, label))
            })
            .collect();

        Self {
            lang: "en".to_string(),
            tokenizer: BlankTokenizer::new(),
            entries,
        }
    }

    /// Number of known token texts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the lexicon knows no tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for a token text, if known.
    pub fn lookup(&self, token: &str) -> Option<Label> {
        self.entries.get(&token.to_lowercase()).copied()
    }

    /// Writes the model into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let file = LexiconFile {
            lang: self.lang.clone(),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        crate::write_atomic(&dir.join(LEXICON_FILE), json.as_bytes())?;
        info!(dir = %dir.display(), entries = self.len(), "saved lexicon model");
        Ok(())
    }

    /// Loads a model directory written by [`LexiconModel::save`].
    ///
    /// # Errors
    ///
    /// `AddrnerError::ModelLoad` if the directory has no readable lexicon,
    /// `AddrnerError::UnsupportedLanguage` for an unknown language code.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(LEXICON_FILE);
        let json = fs::read_to_string(&path)
            .map_err(|e| AddrnerError::ModelLoad(format!("{}: {e}", path.display())))?;
        let file: LexiconFile = serde_json::from_str(&json)
            .map_err(|e| AddrnerError::ModelLoad(format!("{}: {e}", path.display())))?;
        let tokenizer = blank(&file.lang)?;
        debug!(path = %path.display(), entries = file.entries.len(), "loaded lexicon model");
        Ok(Self {
            lang: file.lang,
            tokenizer,
            entries: file.entries,
        })
    }
}

impl EntityRecognizer for LexiconModel {
    fn tokenizer(&self) -> &dyn Tokenizer {
        &self.tokenizer
    }

    fn recognize(&self, text: &str) -> Result<Document> {
        let mut doc = self.tokenizer.make_doc(text);
        let mut spans: Vec<Span> = Vec::new();

        for token in doc.tokens() {
            let Some(label) = self.lookup(&token.text) else {
                continue;
            };
            match spans.last_mut() {
                Some(last) if last.label == label && last.end_token == token.index => {
                    last.end = token.end;
                    last.end_token = token.index + 1;
                }
                _ => spans.push(Span {
                    start: token.start,
                    end: token.end,
                    start_token: token.index,
                    end_token: token.index + 1,
                    label,
                }),
            }
        }

        doc.set_ents(spans)?;
        Ok(doc)
    }
}
