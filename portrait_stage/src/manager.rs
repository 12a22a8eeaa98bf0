//! Session manager tying a [`Stage`] to a [`StateStore`].
//!
//! The reducer stays synchronous; loading and saving happen around it.

use portrait_core::{AnnotatorConfig, IncomingMessage, TurnOutcome};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::stage::{Stage, ViewModel};
use crate::store::{StateStore, StoredState};

/// Summary of a transcript replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub processed: usize,
    pub skipped: usize,
}

pub struct StageManager<S: StateStore> {
    stage: Stage,
    store: S,
    session_id: Uuid,
    stored: StoredState,
}

impl<S: StateStore> StageManager<S> {
    /// Open a session, resuming persisted state when the store has it.
    pub async fn new(config: &AnnotatorConfig, store: S, session_id: Uuid) -> Result<Self> {
        let mut stage = Stage::new(config);

        let stored = if let Some(stored) = store.load(&session_id).await.map_err(Error::Store)? {
            info!(
                "Resuming session {session_id} after {} turn(s)",
                stored.turns
            );
            stage.restore(stored.state.clone());
            stored
        } else {
            info!("Starting session {session_id}");
            let init = stage.initialize();
            let stored = StoredState::new(init.initial_state);
            store
                .save(&session_id, &stored)
                .await
                .map_err(Error::Store)?;
            stored
        };

        Ok(Self {
            stage,
            store,
            session_id,
            stored,
        })
    }

    /// Open an existing session; fails when the store has no state for it.
    pub async fn resume(config: &AnnotatorConfig, store: S, session_id: Uuid) -> Result<Self> {
        if store
            .load(&session_id)
            .await
            .map_err(Error::Store)?
            .is_none()
        {
            return Err(Error::SessionNotFound(session_id));
        }
        Self::new(config, store, session_id).await
    }

    /// Run one message through the stage, persisting on update.
    ///
    /// The new state is committed only after the store accepted it; on a
    /// save error the session is left as it was before the message.
    pub async fn handle_message(&mut self, message: &IncomingMessage) -> Result<TurnOutcome> {
        let outcome = self.stage.evaluate(message);

        if let TurnOutcome::Updated(report) = &outcome {
            let mut next = self.stored.clone();
            next.advance(report.state.clone());
            self.store
                .save(&self.session_id, &next)
                .await
                .map_err(Error::Store)?;

            self.stage.restore(report.state.clone());
            self.stored = next;
            debug!(
                "Session {} turn {} persisted",
                self.session_id, self.stored.turns
            );
        }

        Ok(outcome)
    }

    /// Process a transcript in order.
    pub async fn replay(&mut self, messages: &[IncomingMessage]) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for message in messages {
            match self.handle_message(message).await? {
                TurnOutcome::Skipped => summary.skipped += 1,
                TurnOutcome::Updated(_) => summary.processed += 1,
            }
        }
        info!(
            "Replayed {} message(s): {} processed, {} skipped",
            messages.len(),
            summary.processed,
            summary.skipped
        );
        Ok(summary)
    }

    #[must_use]
    pub fn view_model(&self) -> ViewModel {
        self.stage.view_model()
    }

    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub const fn stored(&self) -> &StoredState {
        &self.stored
    }

    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }
}
