use portrait_stage::StageManager;
use std::path::PathBuf;
use uuid::Uuid;

use super::{init_common_components, render_view};

#[derive(Debug, Clone)]
pub struct ShowInput {
    pub config_path: Option<PathBuf>,
    pub session_id: Uuid,
}

/// Strategy for printing the panel of a stored session.
#[derive(Debug, Clone, Copy)]
pub struct ShowStrategy;

impl super::CommandStrategy for ShowStrategy {
    type Input = ShowInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components(input.config_path).await?;
        let manager =
            StageManager::resume(&common.config.stage, common.store, input.session_id).await?;

        println!(
            "Session: {} ({} turn(s), updated {})",
            input.session_id,
            manager.stored().turns,
            manager.stored().updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        print!("{}", render_view(&manager.view_model()));
        Ok(())
    }
}
