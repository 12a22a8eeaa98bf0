use portrait_config::Config;
use std::path::PathBuf;

/// Strategy for displaying configuration information.
///
/// This strategy outputs the resolved configuration including:
/// - Roster source and size
/// - Per-turn cap and author fallback
/// - Balance pattern and whether it compiles
/// - State directory
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default(input.as_deref())?;
        let settings = config.stage.resolve();

        println!("=== portraits Configuration ===\n");

        println!("Roster:");
        if config.stage.characters.is_empty() {
            println!("  Source: built-in ({} characters)", settings.roster.len());
        } else {
            println!("  Source: config ({} characters)", settings.roster.len());
        }
        for entity in &settings.roster {
            if entity.aliases.is_empty() {
                println!("    {}", entity.name);
            } else {
                println!("    {} ({})", entity.name, entity.aliases.join(", "));
            }
        }
        println!();

        println!("Detection:");
        println!("  Max Per Turn: {}", settings.max_per_turn);
        println!("  Fallback To Author: {}", settings.fallback_to_author);
        if settings.initial_speakers.is_empty() {
            println!("  Initial Speakers: (none)");
        } else {
            println!("  Initial Speakers: {}", settings.initial_speakers.join(", "));
        }
        println!();

        println!("Balance:");
        println!("  Shown: {}", settings.show_balance);
        println!("  Label: {}", settings.currency_label);
        println!("  Pattern: {}", settings.balance.pattern());
        if !settings.balance.is_valid() {
            println!("  Status: invalid pattern, extraction disabled");
        }
        println!();

        println!("Panel:");
        println!("  Visible: {}", settings.show_panel);
        println!("  State Dir: {}", config.storage.state_dir.display());

        Ok(())
    }
}
