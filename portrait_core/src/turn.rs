//! Per-turn state reduction.
//!
//! One eligible message produces exactly one new [`TurnState`]. The
//! reducer is pure: the caller owns the state and decides where it lives.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alias::AliasIndex;
use crate::config::TurnSettings;
use crate::entity::Entity;
use crate::message::IncomingMessage;
use crate::scanner::scan_with_index;

/// State persisted between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    /// Speakers of the last eligible message, at most the configured cap.
    #[serde(default, alias = "lastSpeakers")]
    pub last_speakers: Vec<Entity>,

    /// Last successfully extracted balance. Never cleared once set.
    #[serde(default, alias = "balanceValue", alias = "balanceC")]
    pub balance_value: Option<f64>,
}

impl TurnState {
    #[must_use]
    pub fn speaker_names(&self) -> Vec<&str> {
        self.last_speakers.iter().map(|e| e.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub state: TurnState,
    /// Speakers came from the author fallback rather than the text.
    pub used_fallback: bool,
    /// Distinct hits before the cap was applied.
    pub detected: usize,
    pub balance_changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// User-authored message. Nothing changes and nothing is persisted.
    Skipped,
    Updated(TurnReport),
}

impl TurnOutcome {
    #[must_use]
    pub const fn state(&self) -> Option<&TurnState> {
        match self {
            Self::Skipped => None,
            Self::Updated(report) => Some(&report.state),
        }
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Initial state for a new session.
///
/// Configured initial speakers resolve through the alias index; unknown
/// names are dropped, duplicates collapse and the cap applies.
#[must_use]
pub fn initial_state(settings: &TurnSettings) -> TurnState {
    let index = AliasIndex::build(&settings.roster);
    let mut speakers: Vec<Entity> = Vec::new();

    for name in &settings.initial_speakers {
        let Some(entity) = index.resolve(name) else {
            debug!("Initial speaker {name:?} is not on the roster");
            continue;
        };
        if !speakers.iter().any(|s| s.name == entity.name) {
            speakers.push(entity.clone());
        }
    }
    speakers.truncate(settings.max_per_turn);

    TurnState {
        last_speakers: speakers,
        balance_value: None,
    }
}

/// Reduce one incoming message into the next state.
#[must_use]
pub fn process_turn(
    message: &IncomingMessage,
    settings: &TurnSettings,
    prior: &TurnState,
) -> TurnOutcome {
    if message.is_user_authored() {
        debug!("Skipping user-authored message");
        return TurnOutcome::Skipped;
    }

    let index = AliasIndex::build(&settings.roster);
    let text = message.text();

    let mut speakers = scan_with_index(text, &index);
    let mut used_fallback = false;

    if speakers.is_empty() && settings.fallback_to_author {
        if let Some(entity) = index.resolve(message.author_name()) {
            speakers.push(entity);
            used_fallback = true;
        }
    }

    let detected = speakers.len();
    speakers.truncate(settings.max_per_turn);

    let balance_value = if settings.show_balance {
        settings.balance.extract(text, prior.balance_value)
    } else {
        prior.balance_value
    };

    let state = TurnState {
        last_speakers: speakers.into_iter().cloned().collect(),
        balance_value,
    };

    debug!(
        "Turn reduced: {} speaker(s) of {detected} detected, fallback={used_fallback}, balance={:?}",
        state.last_speakers.len(),
        state.balance_value
    );

    TurnOutcome::Updated(TurnReport {
        balance_changed: balance_value != prior.balance_value,
        state,
        used_fallback,
        detected,
    })
}
