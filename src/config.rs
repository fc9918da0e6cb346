use crate::cli::Cli;
use crate::options::{OutputFormat, ValidationOptions};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub validator: ValidatorConfig,
    pub options: ValidationOptions,
}

/// How to launch the validator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Java executable
    pub java: String,
    /// JVM arguments placed before `-jar`
    pub java_args: Vec<String>,
    /// Location of `vnu.jar`
    pub jar: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            // vnu recurses deeply on large documents
            java_args: vec!["-Xss1024k".to_string()],
            jar: None,
        }
    }
}

const CONFIG_NAMES: [&str; 4] = [
    "w3c-validator.toml",
    "w3c-validator.json",
    ".w3c-validator.toml",
    ".w3c-validator.json",
];

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            config = Self::merge_configs(config, Self::load_from_file(config_path).await?);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides(config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;
        log::debug!("Loading configuration from {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in the current directory, then the user config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        for name in &CONFIG_NAMES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("w3c-validator");
            for name in &CONFIG_NAMES {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(jar) = env.get("VNU_JAR") {
            config.validator.jar = Some(PathBuf::from(jar));
        }

        if let Some(java) = env.get("W3C_VALIDATOR_JAVA") {
            config.validator.java = java;
        }

        if let Some(format) = env.get("W3C_VALIDATOR_FORMAT") {
            config.options.format = Some(
                OutputFormat::from_str(&format, true).map_err(|_| {
                    ConfigError::Environment(format!(
                        "Invalid W3C_VALIDATOR_FORMAT value: {}",
                        format
                    ))
                })?,
            );
        }

        if let Some(errors_only) = env.get("W3C_VALIDATOR_ERRORS_ONLY") {
            config.options.errors_only =
                Some(parse_bool("W3C_VALIDATOR_ERRORS_ONLY", &errors_only)?);
        }

        if let Some(verbose) = env.get("W3C_VALIDATOR_VERBOSE") {
            config.options.verbose = Some(parse_bool("W3C_VALIDATOR_VERBOSE", &verbose)?);
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(java) = &cli.java {
            config.validator.java = java.clone();
        }
        if let Some(jar) = &cli.vnu_jar {
            config.validator.jar = Some(jar.clone());
        }

        config.options = config.options.merge(&cli.to_options());
        config
    }

    /// Merge two configurations (second takes precedence for set values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        let defaults = ValidatorConfig::default();

        if override_config.validator.java != defaults.java {
            base.validator.java = override_config.validator.java;
        }
        if override_config.validator.java_args != defaults.java_args {
            base.validator.java_args = override_config.validator.java_args;
        }
        if override_config.validator.jar.is_some() {
            base.validator.jar = override_config.validator.jar;
        }

        base.options = base.options.merge(&override_config.options);
        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.validator.java.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Java executable must not be empty".to_string(),
            ));
        }

        if let Some(jar) = &config.validator.jar
            && !jar.is_file()
        {
            return Err(ConfigError::Validation(format!(
                "vnu.jar not found: {}",
                jar.display()
            )));
        }

        if let Some(output) = &config.options.output
            && output.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "Output path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Environment(format!(
            "Invalid {} value: {}",
            key, value
        ))),
    }
}
