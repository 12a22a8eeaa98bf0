//! Annotator configuration.
//!
//! [`AnnotatorConfig`] is the loose, serde-facing form a host hands over.
//! [`AnnotatorConfig::resolve`] turns it into [`TurnSettings`] once, so the
//! per-turn path never re-derives defaults.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::balance::BalanceExtractor;
use crate::entity::Entity;
use crate::roster::effective_roster;

/// Portraits shown per turn when the host does not say otherwise.
pub const DEFAULT_MAX_PER_TURN: i64 = 3;

/// Speakers shown before the first eligible message.
pub const DEFAULT_INITIAL_SPEAKERS: &[&str] = &[];

pub const DEFAULT_CURRENCY_LABEL: &str = "C";

/// Host configuration. Every field is optional; a missing field and an
/// explicit `null` both take the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    #[serde(
        default = "default_true",
        alias = "showPanel",
        deserialize_with = "true_if_null"
    )]
    pub show_panel: bool,

    /// Cap on speakers per turn. Values below 1 are treated as 1, fractions
    /// are floored.
    #[serde(
        default = "default_max_per_turn",
        alias = "maxPerTurn",
        deserialize_with = "cap_or_default"
    )]
    pub max_per_turn: i64,

    #[serde(default, alias = "fallbackToAuthor", deserialize_with = "null_as_default")]
    pub fallback_to_author: bool,

    /// Roster override. Empty means the built-in roster.
    #[serde(default, deserialize_with = "null_as_default")]
    pub characters: Vec<Entity>,

    #[serde(
        default = "default_true",
        alias = "showBalance",
        deserialize_with = "true_if_null"
    )]
    pub show_balance: bool,

    #[serde(
        default,
        alias = "balanceRegex",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_regex: Option<String>,

    #[serde(default, alias = "initialSpeakers", deserialize_with = "null_as_default")]
    pub initial_speakers: Vec<String>,

    #[serde(
        default = "default_currency_label",
        alias = "currencyLabel",
        deserialize_with = "label_or_default"
    )]
    pub currency_label: String,
}

const fn default_true() -> bool {
    true
}

const fn default_max_per_turn() -> i64 {
    DEFAULT_MAX_PER_TURN
}

fn default_currency_label() -> String {
    DEFAULT_CURRENCY_LABEL.to_string()
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn true_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn label_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_currency_label))
}

/// Accepts integers and floats; `null` means the default cap.
fn cap_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map_or(DEFAULT_MAX_PER_TURN, floor_cap))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate and the cap is clamped afterwards"
)]
fn floor_cap(value: f64) -> i64 {
    value.floor() as i64
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            show_panel: true,
            max_per_turn: DEFAULT_MAX_PER_TURN,
            fallback_to_author: false,
            characters: Vec::new(),
            show_balance: true,
            balance_regex: None,
            initial_speakers: DEFAULT_INITIAL_SPEAKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            currency_label: default_currency_label(),
        }
    }
}

impl AnnotatorConfig {
    #[must_use]
    pub fn with_characters(mut self, characters: Vec<Entity>) -> Self {
        self.characters = characters;
        self
    }

    #[must_use]
    pub const fn with_max_per_turn(mut self, max: i64) -> Self {
        self.max_per_turn = max;
        self
    }

    #[must_use]
    pub const fn with_fallback_to_author(mut self, enabled: bool) -> Self {
        self.fallback_to_author = enabled;
        self
    }

    #[must_use]
    pub fn with_balance_regex(mut self, pattern: impl Into<String>) -> Self {
        self.balance_regex = Some(pattern.into());
        self
    }

    /// The per-turn cap after applying the floor of 1.
    #[must_use]
    pub fn effective_max_per_turn(&self) -> usize {
        usize::try_from(self.max_per_turn.max(1)).unwrap_or(usize::MAX)
    }

    /// Resolve defaults, the roster and the balance pattern.
    #[must_use]
    pub fn resolve(&self) -> TurnSettings {
        let balance = BalanceExtractor::from_config(self.balance_regex.as_deref());
        if let BalanceExtractor::Invalid { pattern, reason } = &balance {
            warn!("Balance pattern {pattern:?} is invalid, extraction disabled: {reason}");
        }

        TurnSettings {
            roster: effective_roster(&self.characters),
            max_per_turn: self.effective_max_per_turn(),
            fallback_to_author: self.fallback_to_author,
            show_panel: self.show_panel,
            show_balance: self.show_balance,
            balance,
            initial_speakers: self.initial_speakers.clone(),
            currency_label: self.currency_label.clone(),
        }
    }
}

/// Fully resolved configuration consumed by the reducer.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub roster: Vec<Entity>,
    pub max_per_turn: usize,
    pub fallback_to_author: bool,
    pub show_panel: bool,
    pub show_balance: bool,
    pub balance: BalanceExtractor,
    pub initial_speakers: Vec<String>,
    pub currency_label: String,
}

impl Default for TurnSettings {
    fn default() -> Self {
        AnnotatorConfig::default().resolve()
    }
}
