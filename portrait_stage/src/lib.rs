#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Host-facing side of the portraits annotator.
//!
//! # Key Features
//! - Lifecycle hooks a chat host calls per session
//! - View model for the speaker panel and balance badge
//! - Pluggable async state persistence (in-memory or JSON files)
//! - Transcript replay

mod error;
mod manager;
mod stage;
mod store;
pub mod transcript;

pub use error::{Error, Result};
pub use manager::{ReplaySummary, StageManager};
pub use stage::{InitResponse, Stage, ViewModel};
pub use store::{JsonFileStateStore, MemoryStateStore, StateStore, StoredState};
pub use transcript::{load_transcript, parse_transcript};
