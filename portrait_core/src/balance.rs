//! Balance extraction from message text.
//!
//! The balance is "last known good": a turn whose text carries no
//! readable amount keeps whatever value the previous turns established.
//! Patterns come from user configuration, so a pattern that fails to
//! compile is treated as one that never matches.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;

/// An optional `C` marker followed by digits with `,`/`.` grouping.
pub const DEFAULT_BALANCE_PATTERN: &str = r"C\s*([0-9][0-9,\.]*)";

/// Compiled-program budget for user patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[expect(clippy::expect_used, reason = "literal pattern")]
static DEFAULT_PATTERN: Lazy<BalancePattern> = Lazy::new(|| {
    BalancePattern::compile(DEFAULT_BALANCE_PATTERN).expect("valid default balance pattern")
});

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid balance pattern: {0}")]
    Invalid(#[from] regex::Error),
}

/// A case-insensitive pattern whose first capture group holds the amount.
#[derive(Debug, Clone)]
pub struct BalancePattern {
    regex: Regex,
}

impl BalancePattern {
    /// Compile a user-supplied pattern.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }

    /// The built-in pattern, [`DEFAULT_BALANCE_PATTERN`].
    #[must_use]
    pub fn default_pattern() -> Self {
        DEFAULT_PATTERN.clone()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Amount captured by the first match in `text`, if it parses.
    #[must_use]
    pub fn capture(&self, text: &str) -> Option<f64> {
        let caps = self.regex.captures(text)?;
        let raw = caps.get(1)?.as_str();
        parse_amount(raw)
    }

    /// New balance for `text`, falling back to `previous`.
    #[must_use]
    pub fn extract(&self, text: &str, previous: Option<f64>) -> Option<f64> {
        self.capture(text).or(previous)
    }
}

impl Default for BalancePattern {
    fn default() -> Self {
        Self::default_pattern()
    }
}

/// Extractor held by resolved settings.
#[derive(Debug, Clone)]
pub enum BalanceExtractor {
    Pattern(BalancePattern),
    /// The configured pattern did not compile. Never extracts anything.
    Invalid { pattern: String, reason: String },
}

impl BalanceExtractor {
    /// Build from an optional configured pattern. Absent or empty means
    /// the default pattern.
    #[must_use]
    pub fn from_config(pattern: Option<&str>) -> Self {
        pattern.filter(|p| !p.is_empty()).map_or_else(
            || Self::Pattern(BalancePattern::default_pattern()),
            |p| {
                BalancePattern::compile(p).map_or_else(
                    |e| Self::Invalid {
                        pattern: p.to_string(),
                        reason: e.to_string(),
                    },
                    Self::Pattern,
                )
            },
        )
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Pattern(p) => p.as_str(),
            Self::Invalid { pattern, .. } => pattern,
        }
    }

    #[must_use]
    pub fn extract(&self, text: &str, previous: Option<f64>) -> Option<f64> {
        match self {
            Self::Pattern(p) => p.extract(text, previous),
            Self::Invalid { .. } => previous,
        }
    }
}

/// Compile `pattern` and extract a balance from `text`.
///
/// Never fails: an invalid pattern, a missing match or an unparsable
/// amount all return `previous` unchanged.
#[must_use]
pub fn extract_balance(text: &str, pattern: &str, previous: Option<f64>) -> Option<f64> {
    match BalancePattern::compile(pattern) {
        Ok(compiled) => compiled.extract(text, previous),
        Err(e) => {
            debug!("Ignoring balance pattern {pattern:?}: {e}");
            previous
        }
    }
}

/// Parse a captured amount after dropping commas and whitespace.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
