//! Follow-up question mining: entity extraction, relevance scoring and
//! template generation.

pub mod error;
pub mod extract;
pub mod generate;
pub mod lexicon;
pub mod relevance;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{FollowupError, FollowupResult};
pub use extract::{NamedEntitySet, extract_entities};
pub use generate::FollowupGenerator;
pub use lexicon::{family_relation, is_excluded, load_pop_culture};
pub use relevance::NO_VERB_WEIGHT;
pub use types::{EntityCategory, EntityMap, EntityObject, FollowupList, FollowupQuestion};
