//! Per-record predicates over a single field.

use regex::Regex;

use crate::error::{Error, Result};
use crate::record::{Collection, Record};

/// How a field's canonical string is matched against the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Case-sensitive equality
    Exact,
    Contains,
    HasPrefix,
    HasSuffix,
    /// Equality under Unicode case folding
    Folded,
    /// Regular expression match anywhere in the value
    Regexp,
}

enum Matcher<'p> {
    Text(FilterMode, &'p str),
    Folded(String),
    Regexp(Regex),
}

impl<'p> Matcher<'p> {
    fn new(pattern: &'p str, mode: FilterMode) -> Result<Self> {
        Ok(match mode {
            FilterMode::Regexp => Matcher::Regexp(Regex::new(pattern).map_err(|e| {
                Error::argument(format!("invalid regular expression '{}': {}", pattern, e))
            })?),
            FilterMode::Folded => Matcher::Folded(fold_case(pattern)),
            other => Matcher::Text(other, pattern),
        })
    }

    fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Text(FilterMode::Contains, p) => value.contains(p),
            Matcher::Text(FilterMode::HasPrefix, p) => value.starts_with(p),
            Matcher::Text(FilterMode::HasSuffix, p) => value.ends_with(p),
            Matcher::Text(_, p) => value == *p,
            Matcher::Folded(p) => fold_case(value) == *p,
            Matcher::Regexp(re) => re.is_match(value),
        }
    }
}

/// Simple Unicode case folding: lowercase, then merge the lowercase letters
/// that fold together with another one (final sigma, long s).
fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ς' => 'σ',
            'ſ' => 's',
            other => other,
        })
        .collect()
}

/// Keep the records whose `field` matches `pattern` under `mode`.
///
/// `field` is a single field name. Records on which it does not resolve are
/// excluded rather than reported. A malformed regular expression fails the
/// whole call.
pub fn filter(
    collection: &Collection,
    field: &str,
    pattern: &str,
    mode: FilterMode,
) -> Result<Collection> {
    let matcher = Matcher::new(pattern, mode)?;

    let kept: Vec<Record> = collection
        .iter()
        .filter(|record| match record.get(field) {
            Some(value) => matcher.is_match(&value.to_string()),
            None => {
                tracing::debug!("filter: field '{}' missing, record excluded", field);
                false
            }
        })
        .cloned()
        .collect();

    tracing::debug!(
        "filter {:?} on '{}' kept {} of {} records",
        mode,
        field,
        kept.len(),
        collection.len()
    );
    Ok(collection.with_records(kept))
}
