use crate::models::Settings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::fs;

/// Prefix for environment overrides, e.g. `SENTIMENT_TOKEN_DELAY_MS=200`
pub const ENV_PREFIX: &str = "SENTIMENT";

/// Configuration manager for loading and saving the runtime settings file.
///
/// Settings are layered: built-in defaults, then `settings.yaml` in the
/// configuration directory (optional), then `SENTIMENT_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing `settings.yaml` (created if missing)
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("settings.yaml"),
        })
    }

    /// Load settings from the file and the process environment.
    pub fn load_settings(&self) -> Result<Settings> {
        self.load_settings_from_env(None)
    }

    /// Load settings using `env` in place of the process environment.
    ///
    /// Keys use the same `SENTIMENT_` form as real environment variables.
    /// Passing `None` reads the process environment.
    pub fn load_settings_from_env(&self, env: Option<HashMap<String, String>>) -> Result<Settings> {
        if self.settings_path.exists() {
            tracing::info!("Loading settings from {}", self.settings_path);
        } else {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let defaults = Config::try_from(&Settings::default())
            .context("Failed to build default settings")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?;

        let settings: Settings = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        Ok(settings)
    }

    /// Save settings as YAML.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Write the default settings file if none exists yet.
    ///
    /// Returns `true` if a file was written.
    pub fn ensure_settings_file(&self) -> Result<bool> {
        if self.settings_path.exists() {
            return Ok(false);
        }
        self.save_settings(&Settings::default())?;
        Ok(true)
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
