//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, so
//! dispatch in `main` is monomorphized rather than boxed.

use portrait_config::Config;
use portrait_stage::{JsonFileStateStore, ViewModel};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

mod annotate;
mod info;
mod init;
mod sessions;
mod show;
mod version;

pub use annotate::{AnnotateInput, AnnotateStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use sessions::{SessionsInput, SessionsStrategy};
pub use show::{ShowInput, ShowStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Components shared by the commands that touch session state.
struct CommonComponents {
    config: Config,
    store: JsonFileStateStore,
}

async fn init_common_components(config_path: Option<PathBuf>) -> anyhow::Result<CommonComponents> {
    let config = Config::load_or_default(config_path.as_deref())?;
    let store = JsonFileStateStore::new(config.storage.state_dir.clone()).await?;
    info!(
        "Using {} configured character(s)",
        config.stage.characters.len()
    );
    Ok(CommonComponents { config, store })
}

/// Plain-text rendering of the speaker panel.
fn render_view(view: &ViewModel) -> String {
    if view.hidden {
        return "Portraits panel (hidden by config)\n".to_string();
    }

    let mut out = String::from("Now speaking");
    if let Some(badge) = view.balance_display() {
        let _ = write!(out, "    [{badge}]");
    }
    out.push('\n');

    if view.speakers.is_empty() {
        out.push_str("  No speakers detected. Dialogue lines must start with `Name:`.\n");
    } else {
        for speaker in &view.speakers {
            let _ = writeln!(out, "  {}  <{}>", speaker.name, speaker.image_url);
        }
    }
    out
}
