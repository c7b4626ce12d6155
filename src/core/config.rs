//! Configuration management for Blueprint.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// UI/TUI settings
    pub ui: UiConfig,

    /// AI suggestion service settings
    pub ai: AiConfig,

    /// Block editor settings
    pub editor: EditorConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Open the starter blueprint in the editor once the wizard completes
    pub open_editor_on_complete: bool,

    /// Directory where completed runs and blueprints are written by default
    pub output_dir: Option<String>,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, paper, nord)
    pub theme: String,

    /// Whether to show command icons in the block menu
    pub show_icons: bool,

    /// Whether to enable mouse support
    pub mouse: bool,
}

/// AI suggestion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether AI suggestions are requested at all (fallbacks are used otherwise)
    pub enabled: bool,

    /// Providers to try, in order (openai, claude)
    pub providers: Vec<String>,

    /// OpenAI model
    pub openai_model: String,

    /// OpenAI-compatible base URL
    pub openai_base_url: String,

    /// Claude model
    pub claude_model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Block editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Character that opens the block command menu
    pub trigger: char,

    /// Maximum number of commands shown at once in the menu
    pub max_visible_commands: usize,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.blueprint.toml` in current directory
    /// 2. `~/.config/blueprint/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".blueprint.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir =
            Self::config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_dir.join("config.toml"), content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("blueprint"))
    }

    /// Get the global config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the data directory path (for logs and saved runs).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("blueprint"))
    }

    /// Resolve the configured output directory, expanding `~` and env vars.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.general
            .output_dir
            .as_deref()
            .and_then(|dir| shellexpand::full(dir).ok())
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { open_editor_on_complete: false, output_dir: None }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "default".to_string(), show_icons: true, mouse: true }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: vec!["openai".to_string(), "claude".to_string()],
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            claude_model: "claude-sonnet-4-20250514".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { trigger: '/', max_visible_commands: 10 }
    }
}
