//! Inbound chat message as delivered by the host.
//!
//! Hosts disagree on where they put the text and the author, so every
//! source field is optional and resolution follows a fixed priority:
//!
//! - role: `role`, then `author.role` (first non-empty)
//! - text: `text`, then `content`, then `body` (first present)
//! - author name: `author.name`, then `character.name`, then `bot.name`
//!   (first non-empty)

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
    Other,
}

impl Role {
    /// Classify a host role marker, case-insensitively.
    #[must_use]
    pub fn from_marker(marker: &str) -> Self {
        match marker.to_lowercase().as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            "tool" => Self::Tool,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<NamedRef>,
    /// Bot identity the host attaches to its own replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl IncomingMessage {
    /// A message with `role` and `text` set.
    #[must_use]
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        let author = self.author.get_or_insert_with(Author::default);
        author.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        non_empty(self.role.as_ref())
            .or_else(|| self.author.as_ref().and_then(|a| non_empty(a.role.as_ref())))
            .map(Role::from_marker)
    }

    #[must_use]
    pub fn is_user_authored(&self) -> bool {
        self.role() == Some(Role::User)
    }

    /// Message text; a present-but-empty field still wins.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text
            .as_deref()
            .or(self.content.as_deref())
            .or(self.body.as_deref())
            .unwrap_or_default()
    }

    /// Author display name used by the fallback policy.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| non_empty(a.name.as_ref()))
            .or_else(|| self.character.as_ref().and_then(|c| non_empty(c.name.as_ref())))
            .or_else(|| self.bot.as_ref().and_then(|b| non_empty(b.name.as_ref())))
            .unwrap_or_default()
    }
}
