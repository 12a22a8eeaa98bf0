use portrait_stage::StateStore;
use std::path::PathBuf;
use uuid::Uuid;

use super::init_common_components;

#[derive(Debug, Clone)]
pub struct SessionsInput {
    pub config_path: Option<PathBuf>,
    pub clear: Option<Uuid>,
}

/// Strategy for listing or clearing stored sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionsStrategy;

impl super::CommandStrategy for SessionsStrategy {
    type Input = SessionsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components(input.config_path).await?;

        if let Some(id) = input.clear {
            if common.store.clear(&id).await? {
                println!("Cleared session {id}");
            } else {
                println!("No stored session {id}");
            }
            return Ok(());
        }

        let ids = common.store.list().await?;
        if ids.is_empty() {
            println!("No stored sessions in {}", common.config.storage.state_dir.display());
            return Ok(());
        }

        for id in ids {
            match common.store.load(&id).await? {
                Some(stored) => {
                    let names = stored.state.speaker_names().join(", ");
                    println!("{id}  turns={}  speakers=[{names}]", stored.turns);
                }
                None => println!("{id}"),
            }
        }
        Ok(())
    }
}
