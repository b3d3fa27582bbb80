//! Pipeline configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `POSTPILOT__*` environment variables (`__` separates nesting levels, e.g.
//! `POSTPILOT__LINKEDIN__REQUEST_TIMEOUT_SECS=5`).

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment as EnvSource, File, FileFormat};
use postpilot_error::{ConfigError, PostpilotResult};
use postpilot_social::LinkedInSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Prefix of environment variables read by [`PipelineConfig::load`].
pub const ENV_PREFIX: &str = "POSTPILOT";

/// Deployment environment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Pre-production
    Staging,
    /// Production
    Production,
}

impl Environment {
    /// True in production.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// True in local development.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Log output format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Text-generation provider settings.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat-completions endpoint
    api_base_url: String,
    /// Model used when the user has none configured
    default_model: String,
    /// Completion length cap sent with every request
    max_tokens: u32,
    /// Sampling temperature sent with every request
    temperature: f32,
    /// Instruction prepended to the topic to form the prompt
    prompt_prefix: String,
}

impl GenerationSettings {
    /// Creates a builder for GenerationSettings.
    pub fn builder() -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::default()
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            default_model: "gpt-3.5-turbo".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            prompt_prefix:
                "Write a social media post suggestion based on the following topic/article: "
                    .to_string(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct StorageSettings {
    /// PostgreSQL URL; in-memory stores are used when absent
    database_url: Option<String>,
    /// Connection pool size
    max_connections: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
        }
    }
}

/// Listing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ListSettings {
    /// Page size when the caller gives none
    default_limit: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self { default_limit: 50 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format
    format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: "info".to_string(),
        }
    }
}

/// Complete pipeline configuration.
///
/// # Examples
///
/// ```
/// use postpilot_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str(r#"
///     [linkedin]
///     request_timeout_secs = 5
///
///     [list]
///     default_limit = 20
/// "#).unwrap();
///
/// assert_eq!(*config.linkedin().request_timeout_secs(), 5);
/// assert_eq!(*config.list().default_limit(), 20);
/// assert_eq!(config.generation().default_model(), "gpt-3.5-turbo");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Deployment environment
    environment: Environment,
    /// Text-generation provider
    generation: GenerationSettings,
    /// LinkedIn API
    linkedin: LinkedInSettings,
    /// Record stores
    storage: StorageSettings,
    /// Listing
    list: ListSettings,
    /// Logging
    logging: LoggingSettings,
}

impl PipelineConfig {
    /// Creates a builder for PipelineConfig.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load from an optional TOML file and the process environment.
    ///
    /// A `path` that is given must exist.
    #[instrument]
    pub fn load(path: Option<&Path>) -> PostpilotResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        Self::assemble(builder.add_source(env_source()))
    }

    /// Parse a TOML document over the defaults, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> PostpilotResult<Self> {
        Self::assemble(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn assemble(builder: ConfigBuilder<DefaultState>) -> PostpilotResult<Self> {
        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(ConfigError::from)?;
        config.validate()?;
        debug!(environment = %config.environment, "Loaded configuration");
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if *self.linkedin.request_timeout_secs() == 0 {
            return Err(ConfigError::new("linkedin.request_timeout_secs must be positive"));
        }
        if self.linkedin.api_base_url().trim().is_empty() {
            return Err(ConfigError::new("linkedin.api_base_url must not be empty"));
        }
        if self.list.default_limit == 0 {
            return Err(ConfigError::new("list.default_limit must be positive"));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::new("generation.max_tokens must be positive"));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::new(format!(
                "generation.temperature must be between 0 and 2, got {}",
                self.generation.temperature
            )));
        }
        if self.generation.default_model.trim().is_empty() {
            return Err(ConfigError::new("generation.default_model must not be empty"));
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::new("storage.max_connections must be positive"));
        }
        Ok(())
    }
}

fn env_source() -> EnvSource {
    EnvSource::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postpilot_error::PostpilotErrorKind;
    use std::collections::HashMap;

    #[test]
    fn invalid_values_are_config_errors() {
        let cases = [
            ("[linkedin]\nrequest_timeout_secs = 0\n", "request_timeout_secs"),
            ("[linkedin]\napi_base_url = \"  \"\n", "api_base_url"),
            ("[list]\ndefault_limit = 0\n", "default_limit"),
            ("[generation]\nmax_tokens = 0\n", "max_tokens"),
            ("[generation]\ntemperature = 2.5\n", "temperature"),
            ("[generation]\ntemperature = -0.1\n", "temperature"),
            ("[generation]\ndefault_model = \"\"\n", "default_model"),
            ("[storage]\nmax_connections = 0\n", "max_connections"),
        ];

        for (toml, field) in cases {
            let err = PipelineConfig::from_toml_str(toml).unwrap_err();
            match err.kind() {
                PostpilotErrorKind::Config(e) => {
                    assert!(e.message.contains(field), "{toml:?}: {}", e.message)
                }
                other => panic!("{toml:?}: expected a config error, got {other:?}"),
            }
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(*config.list().default_limit(), 50);
        assert_eq!(*config.storage().max_connections(), 10);
    }

    #[test]
    fn environment_overrides_file() {
        let vars = HashMap::from([
            (
                "POSTPILOT__LINKEDIN__REQUEST_TIMEOUT_SECS".to_string(),
                "3".to_string(),
            ),
            ("POSTPILOT__ENVIRONMENT".to_string(), "production".to_string()),
            ("POSTPILOT__LOGGING__FORMAT".to_string(), "json".to_string()),
        ]);
        let builder = Config::builder()
            .add_source(File::from_str(
                "[linkedin]\nrequest_timeout_secs = 7\n",
                FileFormat::Toml,
            ))
            .add_source(env_source().source(Some(vars)));

        let config = PipelineConfig::assemble(builder).unwrap();

        assert_eq!(*config.linkedin().request_timeout_secs(), 3);
        assert!(config.environment().is_production());
        assert_eq!(*config.logging().format(), LogFormat::Json);
    }
}
