//! Fixed lexicons used by entity extraction and relevance scoring.

use std::collections::HashSet;
use std::path::Path;

use super::error::{FollowupError, FollowupResult};

/// Family-relation terms and their canonical forms.
///
/// Matching is case-sensitive and whole-token; `mom` and `mother` both
/// canonicalize to `mother`.
const FAMILY_MEMBERS: &[(&str, &str)] = &[
    ("mother", "mother"),
    ("mom", "mother"),
    ("father", "father"),
    ("dad", "father"),
    ("brother", "brother"),
    ("bro", "brother"),
    ("sister", "sister"),
    ("sis", "sister"),
    ("cousin", "cousin"),
    ("husband", "spouse"),
    ("wife", "spouse"),
    ("spouse", "spouse"),
    ("grandpa", "grandfather"),
    ("grandfather", "grandfather"),
    ("grandma", "grandmother"),
    ("grandmother", "grandmother"),
    ("aunt", "aunt"),
    ("uncle", "uncle"),
    ("siblings", "siblings"),
];

/// Entity texts never worth asking about.
const EXCLUDE: &[&str] = &["America", "United States", "the United States", "US"];

/// Canonical family relation for a token, if it is one.
pub fn family_relation(token_text: &str) -> Option<&'static str> {
    FAMILY_MEMBERS
        .iter()
        .find(|(term, _)| *term == token_text)
        .map(|(_, canonical)| *canonical)
}

/// Whether an entity text is on the fixed exclusion list.
pub fn is_excluded(entity_text: &str) -> bool {
    EXCLUDE.contains(&entity_text)
}

/// Loads the pop-culture reference list from a CSV file (first column).
pub fn load_pop_culture(path: &Path) -> FollowupResult<HashSet<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FollowupError::Lexicon {
            reason: format!("{}: {}", path.display(), e),
        })?;

    let mut terms = HashSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| FollowupError::Lexicon {
            reason: format!("{}: {}", path.display(), e),
        })?;
        if let Some(term) = record.get(0) {
            terms.insert(term.to_string());
        }
    }
    Ok(terms)
}
