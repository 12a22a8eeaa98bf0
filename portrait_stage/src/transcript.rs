//! Transcript files for replaying a conversation through a stage.
//!
//! Accepts either a JSON array of messages or JSON Lines with one message
//! per non-blank line.

use portrait_core::IncomingMessage;
use std::path::Path;

use crate::error::{Error, Result};

pub async fn load_transcript(path: &Path) -> Result<Vec<IncomingMessage>> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_transcript(&content)
}

pub fn parse_transcript(content: &str) -> Result<Vec<IncomingMessage>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|source| Error::Transcript {
            line: source.line(),
            source,
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| Error::Transcript {
                line: i + 1,
                source,
            })
        })
        .collect()
}
