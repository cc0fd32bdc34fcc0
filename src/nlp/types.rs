//! Parsed-document model.
//!
//! The parser service returns sentence segmentation, dependency parses and
//! named-entity spans in one document per input text. Indices are token
//! positions; a root token is its own head.

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Verb,
    Noun,
    Propn,
    Adj,
    Adv,
    Pron,
    Adp,
    Det,
    Punct,
    #[serde(other)]
    Other,
}

/// Dependency relation of a token to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepRel {
    Nsubj,
    Dobj,
    Root,
    #[serde(other)]
    Other,
}

/// Named-entity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// A person's name.
    Person,
    /// An organization (typically surfaces as an acronym).
    Org,
    /// A geopolitical entity (city, state, country).
    Gpe,
    /// A broader location (mountain, river, region).
    Loc,
    #[serde(other)]
    Other,
}

/// One token of a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text.
    pub text: String,
    /// Lemmatized form.
    pub lemma: String,
    /// Part of speech.
    pub pos: Pos,
    /// Dependency relation to the head.
    pub dep: DepRel,
    /// Index of the head token; a root points to itself.
    pub head: usize,
    /// Whether this token opens a sentence.
    #[serde(rename = "isSentStart", default)]
    pub is_sent_start: bool,
    /// Whether this token is punctuation.
    #[serde(rename = "isPunct", default)]
    pub is_punct: bool,
}

/// Token range of one sentence, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
}

/// A named-entity span, end exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// First token of the span.
    pub start: usize,
    /// One past the last token.
    pub end: usize,
    /// Entity label.
    pub label: EntityLabel,
    /// Surface text of the span as it appeared in the source.
    pub text: String,
}

/// A parsed text: tokens, sentence ranges and entity spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<Token>,
    pub sentences: Vec<Sentence>,
    pub entities: Vec<EntitySpan>,
}

impl Document {
    /// Checks internal index consistency.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.tokens.len();
        for (i, token) in self.tokens.iter().enumerate() {
            if token.head >= len {
                return Err(format!("token {} has head {} out of {}", i, token.head, len));
            }
        }
        for sentence in &self.sentences {
            if sentence.start >= sentence.end || sentence.end > len {
                return Err(format!(
                    "sentence range {}..{} out of {}",
                    sentence.start, sentence.end, len
                ));
            }
        }
        for entity in &self.entities {
            if entity.start >= entity.end || entity.end > len {
                return Err(format!(
                    "entity range {}..{} out of {}",
                    entity.start, entity.end, len
                ));
            }
        }
        Ok(())
    }

    /// Tokens of one sentence.
    pub fn sentence_tokens(&self, sentence: Sentence) -> &[Token] {
        &self.tokens[sentence.start..sentence.end]
    }

    /// Entity spans lying fully inside one sentence.
    pub fn entities_in(&self, sentence: Sentence) -> impl Iterator<Item = &EntitySpan> {
        self.entities
            .iter()
            .filter(move |e| e.start >= sentence.start && e.end <= sentence.end)
    }

    /// Whether any token in the document is a verb.
    pub fn has_verb(&self) -> bool {
        self.tokens.iter().any(|t| t.pos == Pos::Verb)
    }

    /// First verb inside a sentence, if any.
    pub fn first_verb_in(&self, sentence: Sentence) -> Option<&Token> {
        self.sentence_tokens(sentence)
            .iter()
            .find(|t| t.pos == Pos::Verb)
    }

    /// Space-joined lemma of a span (mirrors the parser's span lemma).
    pub fn span_lemma(&self, span: &EntitySpan) -> String {
        self.tokens[span.start..span.end]
            .iter()
            .map(|t| t.lemma.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indices of the direct dependency children of a token.
    pub fn children_of(&self, head: usize) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(i, t)| t.head == head && *i != head)
    }
}
