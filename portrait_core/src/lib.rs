#![deny(
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

//! Speaker detection for chat transcripts.
//!
//! Scans assistant messages for `Name:` attribution lines, resolves them
//! against a roster of known characters and tracks an optional balance
//! counter extracted from the same text.

pub mod alias;
pub mod balance;
pub mod canonical;
pub mod config;
pub mod entity;
pub mod message;
pub mod roster;
pub mod scanner;
pub mod turn;

pub use alias::AliasIndex;
pub use balance::{
    BalanceExtractor, BalancePattern, DEFAULT_BALANCE_PATTERN, PatternError, extract_balance,
};
pub use canonical::canonicalize;
pub use config::{AnnotatorConfig, DEFAULT_MAX_PER_TURN, TurnSettings};
pub use entity::Entity;
pub use message::{Author, IncomingMessage, NamedRef, Role};
pub use roster::default_roster;
pub use scanner::scan;
pub use turn::{TurnOutcome, TurnReport, TurnState, initial_state, process_turn};
