use serde::{Deserialize, Serialize};

use crate::config::null_as_default;

/// A known speaker on the roster.
///
/// Entities are configuration: the core copies them into turn state but
/// never edits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name, unique within a roster.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Alternate spellings that resolve to this entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,

    /// Opaque image reference for the presentation layer.
    #[serde(default, alias = "imageUrl", deserialize_with = "null_as_default")]
    pub image_url: String,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub traits: Vec<String>,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            image_url: image_url.into(),
            traits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    /// The name followed by every alias, skipping empty tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|t| !t.is_empty())
    }
}
