//! # Tokenizer
//!
//! Segments raw address text into tokens for span alignment. Token text is
//! never normalized: every token is an exact slice of the input so that
//! entity offsets stay valid.

use crate::doc::Document;
use crate::error::{AddrnerError, Result};

/// A token with its byte range in the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start byte offset in the input string
    pub start: usize,
    /// End byte offset in the input string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Text segmentation capability.
pub trait Tokenizer {
    /// Split `text` into tokens. Tokens are ordered and never overlap.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Build an unannotated document from raw text.
    fn make_doc(&self, text: &str) -> Document {
        Document::new(text, self.tokenize(text))
    }
}

/// Characters split off the front of a whitespace-delimited chunk.
const PREFIXES: &[char] = &['(', '[', '{', '"', '#'];

/// Characters split off the back of a whitespace-delimited chunk.
const SUFFIXES: &[char] = &[',', ';', ':', ')', ']', '}', '"', '!', '?'];

/// Rule-based English tokenizer with no trained components.
///
/// Splits on whitespace, then peels opening punctuation and `#` off the
/// front of each chunk and closing punctuation off the back. Periods stay
/// attached so abbreviations such as `St.` and `S.` remain one token.
#[derive(Debug, Clone, Default)]
pub struct BlankTokenizer;

impl BlankTokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    fn push(tokens: &mut Vec<Token>, input: &str, start: usize, end: usize) {
        tokens.push(Token {
            text: input[start..end].to_string(),
            start,
            end,
            index: tokens.len(),
        });
    }

    /// Tokenize a single whitespace-free chunk located at `offset`.
    fn split_chunk(tokens: &mut Vec<Token>, input: &str, offset: usize, chunk: &str) {
        let mut start = offset;
        let mut end = offset + chunk.len();

        while let Some(c) = input[start..end].chars().next() {
            if !PREFIXES.contains(&c) || start + c.len_utf8() == end {
                break;
            }
            Self::push(tokens, input, start, start + c.len_utf8());
            start += c.len_utf8();
        }

        let mut suffixes = Vec::new();
        while let Some(c) = input[start..end].chars().next_back() {
            if !SUFFIXES.contains(&c) || end - c.len_utf8() == start {
                break;
            }
            suffixes.push((end - c.len_utf8(), end));
            end -= c.len_utf8();
        }

        Self::push(tokens, input, start, end);
        for (s, e) in suffixes.into_iter().rev() {
            Self::push(tokens, input, s, e);
        }
    }
}

impl Tokenizer for BlankTokenizer {
    /// Tokenize address text into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use addrner_core::doc::{BlankTokenizer, Tokenizer};
    ///
    /// let tokens = BlankTokenizer::new().tokenize("123 Main St, Chicago");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["123", "Main", "St", ",", "Chicago"]);
    /// ```
    fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chunk_start = None;

        for (idx, c) in input.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = chunk_start.take() {
                    Self::split_chunk(&mut tokens, input, start, &input[start..idx]);
                }
            } else if chunk_start.is_none() {
                chunk_start = Some(idx);
            }
        }

        if let Some(start) = chunk_start {
            Self::split_chunk(&mut tokens, input, start, &input[start..]);
        }

        tokens
    }
}

/// Blank tokenizer for a language code, mirroring a blank pipeline with no
/// trained components.
pub fn blank(lang: &str) -> Result<BlankTokenizer> {
    match lang {
        "en" => Ok(BlankTokenizer::new()),
        other => Err(AddrnerError::UnsupportedLanguage(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        BlankTokenizer::new()
            .tokenize(input)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = BlankTokenizer::new().tokenize("8128 S. DR MARTIN");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].text, "S.");
        assert_eq!(tokens[1].start, 5);
        assert_eq!(tokens[1].end, 7);
        assert_eq!(tokens[3].index, 3);
    }

    #[test]
    fn test_trailing_comma_split() {
        assert_eq!(texts("Chicago, IL"), ["Chicago", ",", "IL"]);
    }

    #[test]
    fn test_prefix_split() {
        assert_eq!(texts("#123 Main St"), ["#", "123", "Main", "St"]);
        assert_eq!(texts("(east side),"), ["(", "east", "side", ")", ","]);
    }

    #[test]
    fn test_lone_punctuation_kept() {
        assert_eq!(texts("Main St & Elm St"), ["Main", "St", "&", "Elm", "St"]);
        assert_eq!(texts(", #"), [",", "#"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(BlankTokenizer::new().tokenize("").is_empty());
        assert!(BlankTokenizer::new().tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn test_offsets_slice_input() {
        let input = "  Cañon City,\nCO 81212-1234 ";
        for token in BlankTokenizer::new().tokenize(input) {
            assert_eq!(&input[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_blank_language() {
        assert!(blank("en").is_ok());
        assert!(matches!(
            blank("xx"),
            Err(AddrnerError::UnsupportedLanguage(ref lang)) if lang == "xx"
        ));
    }
}
