use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

// The annotator settings live in portrait_core so the stage can use them without this crate
use portrait_core::AnnotatorConfig;

const CONFIG_DIR_NAME: &str = "portraits";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub stage: AnnotatorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: Self::default_state_dir(),
        }
    }
}

impl StorageConfig {
    fn default_state_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join("state")
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'portraits init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    /// Load the config at `path`, or defaults when no file exists there.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your characters (name, aliases, image_url) under stage.characters");
        println!("      or leave the list empty to use the built-in roster");
        println!("   2. Run 'portraits annotate --message \"Blair: hello\"' to try it out");
        println!();
        println!("🔧 Configuration options:");
        println!("   - max_per_turn: portraits shown per message (minimum 1)");
        println!("   - fallback_to_author: use the message author when no Name: line is found");
        println!("   - balance_regex: pattern whose first group captures the balance");
        println!("   - initial_speakers: names shown before the first message");
        println!();
        Ok(())
    }

    /// Write the config template to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let config_template = r#"{
  "stage": {
    "show_panel": true,
    "max_per_turn": 3,
    "fallback_to_author": false,
    "show_balance": true,
    "balance_regex": "C\\s*([0-9][0-9,\\.]*)",
    "currency_label": "C",
    "initial_speakers": [],
    "characters": []
  },
  "storage": {}
}"#;

        std::fs::write(path, config_template)?;
        Ok(())
    }
}
