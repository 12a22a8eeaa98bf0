use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State store error: {0}")]
    Store(anyhow::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid transcript at line {line}: {source}")]
    Transcript {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
