use portrait_core::{Author, IncomingMessage, TurnOutcome};
use portrait_stage::{StageManager, load_transcript};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use super::{init_common_components, render_view};

/// Input parameters for the Annotate command strategy.
#[derive(Debug, Clone)]
pub struct AnnotateInput {
    pub config_path: Option<PathBuf>,
    /// Session to continue (creates new if not provided)
    pub session_id: Option<Uuid>,
    /// Transcript file to replay
    pub transcript: Option<PathBuf>,
    /// Single message text
    pub message: Option<String>,
    pub role: String,
    pub author: Option<String>,
}

impl AnnotateInput {
    fn single_message(&self) -> Option<IncomingMessage> {
        let text = self.message.clone()?;
        Some(IncomingMessage {
            role: Some(self.role.clone()),
            author: self.author.clone().map(|name| Author {
                name: Some(name),
                role: None,
            }),
            text: Some(text),
            ..IncomingMessage::default()
        })
    }
}

/// Strategy for running messages through a persisted session.
///
/// - Opens or resumes the session in the configured state directory
/// - Replays a transcript or handles a single message
/// - Prints the resulting panel
#[derive(Debug, Clone, Copy)]
pub struct AnnotateStrategy;

impl super::CommandStrategy for AnnotateStrategy {
    type Input = AnnotateInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components(input.config_path.clone()).await?;
        let session_id = input.session_id.unwrap_or_else(Uuid::now_v7);

        let mut manager = StageManager::new(&common.config.stage, common.store, session_id).await?;

        if let Some(path) = &input.transcript {
            let messages = load_transcript(path).await?;
            let summary = manager.replay(&messages).await?;
            println!(
                "Replayed {} message(s) ({} skipped as user turns)",
                summary.processed + summary.skipped,
                summary.skipped
            );
        } else if let Some(message) = input.single_message() {
            match manager.handle_message(&message).await? {
                TurnOutcome::Skipped => println!("User message: panel unchanged"),
                TurnOutcome::Updated(report) if report.used_fallback => {
                    info!("No attribution lines found, used the message author");
                }
                TurnOutcome::Updated(_) => {}
            }
        } else {
            anyhow::bail!("Nothing to annotate: pass --message or --transcript");
        }

        println!("Session: {session_id}");
        print!("{}", render_view(&manager.view_model()));
        Ok(())
    }
}
