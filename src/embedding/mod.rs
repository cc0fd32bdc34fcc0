//! Embedding/similarity service contract and HTTP client.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{EmbeddingClient, ParaphrasePair, SbertClient};
pub use error::{EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
