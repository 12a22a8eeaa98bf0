//! Host lifecycle adapter.
//!
//! A [`Stage`] owns the resolved settings and the current [`TurnState`]
//! for one session and exposes the hooks a chat host calls: initialize,
//! before-prompt, incoming-message and view-model.

use portrait_core::{
    AnnotatorConfig, Entity, IncomingMessage, TurnOutcome, TurnSettings, TurnState,
    initial_state, process_turn,
};
use serde::Serialize;
use tracing::{debug, info};

/// Result of [`Stage::initialize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitResponse {
    pub ready: bool,
    pub initial_state: TurnState,
}

/// What the presentation layer needs to paint the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub speakers: Vec<Entity>,
    pub balance_value: Option<f64>,
    pub hidden: bool,
    pub show_balance: bool,
    pub currency_label: String,
}

impl ViewModel {
    /// Balance badge text such as `C 1,234.5`, when it should be shown.
    #[must_use]
    pub fn balance_display(&self) -> Option<String> {
        if self.hidden || !self.show_balance {
            return None;
        }
        let value = self.balance_value?;
        let amount = format_amount(value);
        if self.currency_label.is_empty() {
            Some(amount)
        } else {
            Some(format!("{} {amount}", self.currency_label))
        }
    }
}

/// Thousands-grouped amount with at most three decimals.
fn format_amount(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    settings: TurnSettings,
    state: TurnState,
}

impl Stage {
    #[must_use]
    pub fn new(config: &AnnotatorConfig) -> Self {
        Self::from_settings(config.resolve())
    }

    #[must_use]
    pub fn from_settings(settings: TurnSettings) -> Self {
        let state = initial_state(&settings);
        Self { settings, state }
    }

    /// Session start. Always ready; resets to the initial state.
    pub fn initialize(&mut self) -> InitResponse {
        self.state = initial_state(&self.settings);
        info!(
            "Stage initialized: {} roster entries, {} initial speaker(s), cap {}",
            self.settings.roster.len(),
            self.state.last_speakers.len(),
            self.settings.max_per_turn
        );
        InitResponse {
            ready: true,
            initial_state: self.state.clone(),
        }
    }

    /// Replace the current state with one the host persisted earlier.
    ///
    /// Speakers beyond the current cap are dropped, so a state saved under
    /// a larger `max_per_turn` still respects the active configuration.
    pub fn restore(&mut self, mut state: TurnState) {
        if state.last_speakers.len() > self.settings.max_per_turn {
            debug!(
                "Restored state has {} speaker(s), truncating to {}",
                state.last_speakers.len(),
                self.settings.max_per_turn
            );
            state.last_speakers.truncate(self.settings.max_per_turn);
        }
        self.state = state;
    }

    /// Pre-prompt hook. The annotator does nothing before a prompt.
    pub fn before_prompt(&self, _message: &IncomingMessage) {}

    /// Reduce one message. The stage keeps the new state on `Updated`.
    pub fn on_incoming_message(&mut self, message: &IncomingMessage) -> TurnOutcome {
        let outcome = self.evaluate(message);
        if let TurnOutcome::Updated(report) = &outcome {
            self.state = report.state.clone();
        }
        outcome
    }

    /// Reduce one message without keeping the result.
    #[must_use]
    pub fn evaluate(&self, message: &IncomingMessage) -> TurnOutcome {
        let outcome = process_turn(message, &self.settings, &self.state);
        match &outcome {
            TurnOutcome::Skipped => debug!("User message ignored"),
            TurnOutcome::Updated(report) => debug!(
                "Speakers now {:?} (fallback: {})",
                report.state.speaker_names(),
                report.used_fallback
            ),
        }
        outcome
    }

    #[must_use]
    pub fn view_model(&self) -> ViewModel {
        ViewModel {
            speakers: self.state.last_speakers.clone(),
            balance_value: self.state.balance_value,
            hidden: !self.settings.show_panel,
            show_balance: self.settings.show_balance,
            currency_label: self.settings.currency_label.clone(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TurnState {
        &self.state
    }

    #[must_use]
    pub const fn settings(&self) -> &TurnSettings {
        &self.settings
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(&AnnotatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(balance: Option<f64>) -> ViewModel {
        ViewModel {
            speakers: Vec::new(),
            balance_value: balance,
            hidden: false,
            show_balance: true,
            currency_label: "C".to_string(),
        }
    }

    #[test]
    fn amount_grouping() {
        assert_eq!(format_amount(1234.5), "1,234.5");
        assert_eq!(format_amount(1_000_000.0), "1,000,000");
        assert_eq!(format_amount(12.0), "12");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-2500.25), "-2,500.25");
        assert_eq!(format_amount(3.14159), "3.142");
    }

    #[test]
    fn balance_badge_visibility() {
        assert_eq!(view(Some(1234.5)).balance_display().as_deref(), Some("C 1,234.5"));
        assert_eq!(view(None).balance_display(), None);

        let mut hidden = view(Some(1.0));
        hidden.hidden = true;
        assert_eq!(hidden.balance_display(), None);

        let mut disabled = view(Some(1.0));
        disabled.show_balance = false;
        assert_eq!(disabled.balance_display(), None);
    }

    #[test]
    fn initialize_is_ready_with_empty_state() {
        let mut stage = Stage::default();
        let response = stage.initialize();
        assert!(response.ready);
        assert!(response.initial_state.last_speakers.is_empty());
        assert_eq!(response.initial_state.balance_value, None);
    }

    #[test]
    fn incoming_messages_update_view() {
        let mut stage = Stage::default();
        stage.initialize();

        let outcome = stage.on_incoming_message(&IncomingMessage::new(
            "assistant",
            "**Blair:** Welcome back.\nMaya - C 250",
        ));
        assert!(!outcome.is_skipped());

        let view = stage.view_model();
        let names: Vec<&str> = view.speakers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Blair", "Maya"]);
        assert_eq!(view.balance_value, Some(250.0));
        assert!(!view.hidden);
    }

    #[test]
    fn user_messages_leave_state_alone() {
        let mut stage = Stage::default();
        stage.on_incoming_message(&IncomingMessage::new("assistant", "Nami: C 10"));
        let before = stage.state().clone();

        let outcome = stage.on_incoming_message(&IncomingMessage::new("user", "Blair: C 99"));
        assert!(outcome.is_skipped());
        assert_eq!(stage.state(), &before);
    }

    #[test]
    fn hidden_mirrors_show_panel() {
        let mut config = AnnotatorConfig::default();
        config.show_panel = false;
        assert!(Stage::new(&config).view_model().hidden);
    }

    #[test]
    fn evaluate_does_not_commit() {
        let stage = Stage::default();
        let outcome = stage.evaluate(&IncomingMessage::new("assistant", "Nami: hello"));
        assert_eq!(
            outcome.state().map(TurnState::speaker_names),
            Some(vec!["Nami"])
        );
        assert!(stage.state().last_speakers.is_empty());
    }

    #[test]
    fn restore_truncates_to_current_cap() {
        let roster = vec![
            Entity::new("Ankha", "a.png"),
            Entity::new("Blair", "b.png"),
            Entity::new("Maya", "m.png"),
        ];
        let saved = TurnState {
            last_speakers: roster.clone(),
            balance_value: Some(5.0),
        };

        let config = AnnotatorConfig::default()
            .with_characters(roster)
            .with_max_per_turn(2);
        let mut stage = Stage::new(&config);
        stage.restore(saved);

        assert_eq!(stage.state().speaker_names(), ["Ankha", "Blair"]);
        assert_eq!(stage.view_model().speakers.len(), 2);
        assert_eq!(stage.state().balance_value, Some(5.0));
    }
}
