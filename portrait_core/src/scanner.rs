//! Attribution-line scanning.
//!
//! Finds lines shaped like `Name: ...` or `Name - ...` in free text and
//! resolves the leading name against the roster. Markdown bullets, quote
//! markers and bold/italic wrappers around the name are tolerated.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::alias::AliasIndex;
use crate::entity::Entity;

/// A single leading bullet, quote marker or `N.` list number.
#[expect(clippy::expect_used, reason = "literal pattern")]
static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:>|\*|-|[0-9]+\.)\s*").expect("valid marker pattern"));

#[expect(clippy::expect_used, reason = "literal pattern")]
static OPENING_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\*\*|__|\*)").expect("valid emphasis pattern"));

#[expect(clippy::expect_used, reason = "literal pattern")]
static CLOSING_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\*\*|__|\*)\s*$").expect("valid emphasis pattern"));

/// Name candidate: a letter then up to 40 word, space, `.`, `'` or `-`
/// characters, followed by a `:` or `-` delimiter.
#[expect(clippy::expect_used, reason = "literal pattern")]
static ATTRIBUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_ .'\-]{0,40})\s*[:\-]\s*(?:.+)?$")
        .expect("valid attribution pattern")
});

/// Fold typographic punctuation into the ASCII delimiters the line
/// pattern understands.
fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            '\u{FF1A}' => ':',
            other => other,
        })
        .collect()
}

fn strip_decorations(line: &str) -> String {
    let line = LEADING_MARKER.replace(line, "");
    let line = OPENING_EMPHASIS.replace(&line, "");
    CLOSING_EMPHASIS.replace(&line, "").into_owned()
}

/// The raw name candidate of an attribution line, if the line has one.
#[must_use]
pub fn attribution_candidate(line: &str) -> Option<String> {
    let stripped = strip_decorations(line);
    ATTRIBUTION
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Scan `text` with a prebuilt index.
///
/// Returns entities in first-seen order, each at most once.
#[must_use]
pub fn scan_with_index<'a>(text: &str, index: &AliasIndex<'a>) -> Vec<&'a Entity> {
    if text.is_empty() {
        return Vec::new();
    }

    let normalized = normalize_punctuation(text);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut hits = Vec::new();

    for line in normalized.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(candidate) = attribution_candidate(line) else {
            continue;
        };
        let Some(entity) = index.resolve(&candidate) else {
            trace!("Unknown attribution candidate: {candidate:?}");
            continue;
        };
        if seen.insert(entity.name.as_str()) {
            hits.push(entity);
        }
    }

    hits
}

/// Scan `text` for attribution lines naming entities of `roster`.
#[must_use]
pub fn scan(text: &str, roster: &[Entity]) -> Vec<Entity> {
    let index = AliasIndex::build(roster);
    scan_with_index(text, &index)
        .into_iter()
        .cloned()
        .collect()
}
