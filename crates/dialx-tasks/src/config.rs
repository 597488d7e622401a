use config::{Config as ConfigLoader, ConfigError, Environment, File};
use dialx_client::ClientConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "DIAL_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Gateway connection; the API key comes from the environment only
    #[serde(default)]
    pub dial: ClientConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Local image analysed by the image-to-text tasks
    #[serde(default = "default_image_path")]
    pub image_path: PathBuf,
    /// Where generated images are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_remote_image_url")]
    pub remote_image_url: String,
    /// Deployments asked to describe the uploaded image, in order
    #[serde(default = "default_vision_deployments")]
    pub vision_deployments: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_image_path() -> PathBuf {
    PathBuf::from("dialx-banner.png")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_remote_image_url() -> String {
    "https://a-z-animals.com/media/2019/11/Elephant-male-1024x535.jpg".to_string()
}

fn default_vision_deployments() -> Vec<String> {
    vec![
        "gpt-4o".to_string(),
        "claude-3-7-sonnet@20250219".to_string(),
        "gemini-2.5-pro".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            image_path: default_image_path(),
            output_dir: default_output_dir(),
            remote_image_url: default_remote_image_url(),
            vision_deployments: default_vision_deployments(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TaskConfig {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables prefixed with DIALX_ (e.g. DIALX_DIAL__BASE_URL)
    ///
    /// The API key is read from DIAL_API_KEY and never from files.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("DIALX")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: TaskConfig = builder.build()?.try_deserialize()?;

        cfg.dial.api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            ConfigError::Message(format!("{API_KEY_ENV} environment variable is required"))
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }

    /// Configuration for tests and tools that talk to a known gateway
    pub fn for_gateway(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            dial: ClientConfig::new(api_key, base_url),
            tasks: TasksConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [dial]
            base_url = "https://dial.example.com"
            timeout_secs = 30

            [tasks]
            image_path = "assets/banner.png"
            output_dir = "out"
            vision_deployments = ["gpt-4o"]

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: TaskConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.dial.base_url, "https://dial.example.com");
        assert_eq!(config.dial.timeout_secs, 30);
        assert_eq!(config.tasks.output_dir, PathBuf::from("out"));
        assert_eq!(config.tasks.vision_deployments, vec!["gpt-4o".to_string()]);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_config_defaults() {
        let config: TaskConfig = toml::from_str("").unwrap();
        assert_eq!(config.tasks.image_path, PathBuf::from("dialx-banner.png"));
        assert_eq!(config.tasks.vision_deployments.len(), 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.dial.api_key.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dial]\nbase_url = \"http://localhost:9999\"").unwrap();

        let config = TaskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dial.base_url, "http://localhost:9999");
        assert_eq!(
            config.dial.completions_url("gpt-4o"),
            "http://localhost:9999/openai/deployments/gpt-4o/chat/completions"
        );
    }
}
