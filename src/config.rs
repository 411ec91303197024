use crate::model::FormVariant;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the recipe service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the recipe generation endpoint (POST)
    #[serde(default = "default_recipe_path")]
    pub recipe_path: String,
    /// Path of the options endpoint (GET)
    #[serde(default = "default_options_path")]
    pub options_path: String,
    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Which form fields are offered
    #[serde(default)]
    pub variant: FormVariant,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recipe_path: default_recipe_path(),
            options_path: default_options_path(),
            timeout: default_timeout(),
            variant: FormVariant::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_recipe_path() -> String {
    "/generate-recipe".to_string()
}

fn default_options_path() -> String {
    "/options".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_GENERATOR__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_GENERATOR__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config_from("config")
    }
}

/// Load configuration from an optional file (name without extension) and the environment
pub fn load_config_from(file_name: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file_name).required(false))
        .add_source(
            Environment::with_prefix("RECIPE_GENERATOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
