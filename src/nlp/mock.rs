//! Scripted parser and document builder for tests.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::client::Parser;
use super::error::ParseResult;
use super::types::{DepRel, Document, EntityLabel, EntitySpan, Pos, Sentence, Token};

/// Mock parser serving hand-built documents keyed by input text.
///
/// Unscripted texts parse to an empty document.
#[derive(Default)]
pub struct MockParser {
    documents: RwLock<HashMap<String, Document>>,
}

impl MockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the document returned for `text`.
    pub fn set_document(&self, text: &str, document: Document) {
        self.documents.write().insert(text.to_string(), document);
    }
}

impl Parser for MockParser {
    async fn parse(&self, text: &str) -> ParseResult<Document> {
        Ok(self
            .documents
            .read()
            .get(text)
            .cloned()
            .unwrap_or_default())
    }
}

/// Assembles [`Document`]s for tests.
///
/// Push tokens in order, then mark sentence ranges and entity spans.
/// `build` derives sentence-start and punctuation flags and asserts index
/// consistency.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
    entities: Vec<EntitySpan>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token. `head` is the index of its dependency head; point a
    /// root at itself.
    pub fn token(mut self, text: &str, lemma: &str, pos: Pos, dep: DepRel, head: usize) -> Self {
        self.tokens.push(Token {
            text: text.to_string(),
            lemma: lemma.to_string(),
            pos,
            dep,
            head,
            is_sent_start: false,
            is_punct: pos == Pos::Punct,
        });
        self
    }

    /// Marks tokens `start..end` as one sentence.
    pub fn sentence(mut self, start: usize, end: usize) -> Self {
        self.sentences.push(Sentence { start, end });
        self
    }

    /// Marks tokens `start..end` as an entity with the span text joined
    /// from the token texts.
    pub fn entity(mut self, start: usize, end: usize, label: EntityLabel) -> Self {
        let text = self.tokens[start..end]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.entities.push(EntitySpan {
            start,
            end,
            label,
            text,
        });
        self
    }

    pub fn build(mut self) -> Document {
        for sentence in &self.sentences {
            if let Some(token) = self.tokens.get_mut(sentence.start) {
                token.is_sent_start = true;
            }
        }
        let document = Document {
            tokens: self.tokens,
            sentences: self.sentences,
            entities: self.entities,
        };
        document
            .validate()
            .expect("builder produced an inconsistent document");
        document
    }
}
