//! Sentence/entity parser contract and document model.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

pub use client::{HttpParser, Parser};
pub use error::{ParseError, ParseResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{DocumentBuilder, MockParser};
pub use types::{DepRel, Document, EntityLabel, EntitySpan, Pos, Sentence, Token};
