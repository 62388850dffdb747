use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::stats::DEFAULT_TOP_K;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source datastore settings
    pub datastore: DatastoreConfig,
    /// Snapshot/digest output settings
    pub export: ExportConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Where the source msgstore.db lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    /// Path to the `com.whatsapp` folder or the msgstore.db file itself.
    /// Empty means the path must come from the command line.
    pub path: String,
}

/// Output settings for one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the snapshot and digest are written into
    pub output_directory: String,
    /// How many most-active chats the aggregates report
    pub top_k: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Optional log file; enables the JSON file layer
    pub file_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            datastore: DatastoreConfig {
                path: String::new(),
            },
            export: ExportConfig {
                output_directory: "./output".to_string(),
                top_k: DEFAULT_TOP_K,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// defaults, then config files, then `MSGSTORE`-prefixed env vars.
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in AppConfig::default().into_iter() {
            builder = builder.set_default(key, value)?;
        }

        let config = builder
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("MSGSTORE").separator("_"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        if self.export.output_directory.is_empty() {
            return Err(anyhow::anyhow!("output_directory must not be empty"));
        }

        if self.export.top_k == 0 {
            return Err(anyhow::anyhow!("top_k must be greater than 0"));
        }

        Ok(())
    }

    /// Get datastore path from environment or config
    pub fn get_datastore_path(&self) -> String {
        std::env::var("MSGSTORE_DB_PATH").unwrap_or_else(|_| self.datastore.path.clone())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, config::Value>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = std::collections::HashMap::new();

        map.insert(
            "datastore.path".to_string(),
            config::Value::from(self.datastore.path),
        );

        map.insert(
            "export.output_directory".to_string(),
            config::Value::from(self.export.output_directory),
        );
        map.insert(
            "export.top_k".to_string(),
            config::Value::from(self.export.top_k as u64),
        );

        map.insert(
            "logging.level".to_string(),
            config::Value::from(self.logging.level),
        );
        if let Some(file_path) = self.logging.file_path {
            map.insert("logging.file_path".to_string(), config::Value::from(file_path));
        }

        map.into_iter()
    }
}
