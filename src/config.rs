//! Configuration management for the library manager

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LibraryConfig {
    /// JSON document holding the whole registry.
    pub data_file: PathBuf,
    /// Days between issue date and due date.
    pub loan_period_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// When set, logs are also written to `library-manager.log` in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
    /// the explicit file passed on the command line, `LIBRARY_*` variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // LIBRARY_LOGGING__LEVEL=debug -> logging.level
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override the data file from LIBRARY_DATA_FILE if present
            .set_override_option("library.data_file", env::var("LIBRARY_DATA_FILE").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.library.loan_period_days == 0 {
            return Err(ConfigError::Message(
                "library.loan_period_days must be greater than 0".to_string(),
            ));
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Message(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("library.json"),
            loan_period_days: 14,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
