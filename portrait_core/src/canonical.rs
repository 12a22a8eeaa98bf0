//! Name canonicalization.
//!
//! Every lookup key in the alias index goes through [`canonicalize`], so
//! "Amélie", "AMELIE" and "amelie " all land on the same key.

use unicode_normalization::UnicodeNormalization;

/// Fold a display string into a lookup key.
///
/// Lower-cases, decomposes accented characters and keeps only ASCII
/// lowercase letters and digits. Combining marks, whitespace, punctuation
/// and any other non-ASCII character are dropped.
#[must_use]
pub fn canonicalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
