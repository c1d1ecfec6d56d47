use crate::primitives::highlighter::{FormatterTarget, DEFAULT_THEME};
use crate::primitives::lexer::LexerStrategy;
use crate::view::renderer::RenderOptions;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Syntax highlight output (default: true)
    #[serde(default = "default_true")]
    pub highlight: bool,

    /// How to pick a grammar for a file: "fast" or "exhaustive"
    #[serde(default)]
    pub lexer_strategy: LexerStrategy,

    /// When to emit color: "auto" (only to a terminal), "always" or "never"
    #[serde(default)]
    pub color: ColorMode,

    /// Highlighting theme name (one of the bundled syntect themes)
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Width of the line number column, including its leading space
    #[serde(default = "default_gutter_width")]
    pub gutter_width: usize,

    /// Text between the line number column and the line
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_true() -> bool {
    true
}

fn default_theme_name() -> String {
    DEFAULT_THEME.to_string()
}

fn default_gutter_width() -> usize {
    7
}

fn default_separator() -> String {
    "| ".to_string()
}

/// When to write color escapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            highlight: true,
            lexer_strategy: LexerStrategy::default(),
            color: ColorMode::default(),
            theme: default_theme_name(),
            gutter_width: default_gutter_width(),
            separator: default_separator(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("catline").join("config.json"))
    }

    /// Load the config at [`Self::default_config_path`], or defaults when it is
    /// absent or broken
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_config_path().filter(|path| path.exists()) else {
            return Self::default();
        };
        Self::load_from_file(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=32).contains(&self.gutter_width) {
            return Err(ConfigError::Validation(format!(
                "gutter_width must be between 1 and 32 (got {})",
                self.gutter_width
            )));
        }

        if self.separator.contains(['\n', '\r']) {
            return Err(ConfigError::Validation(
                "separator cannot contain line breaks".to_string(),
            ));
        }

        if self.theme.trim().is_empty() {
            return Err(ConfigError::Validation(
                "theme cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether output should carry color escapes
    pub fn formatter_target(&self, stdout_is_terminal: bool) -> FormatterTarget {
        let colored = match self.color {
            ColorMode::Auto => stdout_is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        };
        if colored {
            FormatterTarget::Terminal
        } else {
            FormatterTarget::Plain
        }
    }

    /// Renderer options for this configuration
    ///
    /// Uncolored output uses the plain renderer; there is nothing to highlight.
    pub fn render_options(&self, stdout_is_terminal: bool) -> RenderOptions {
        let formatter = self.formatter_target(stdout_is_terminal);
        RenderOptions {
            highlight: self.highlight && formatter == FormatterTarget::Terminal,
            lexer_strategy: self.lexer_strategy,
            formatter,
            theme: self.theme.clone(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}
