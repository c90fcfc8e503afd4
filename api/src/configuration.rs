use crate::domain::{ArtifactToken, DuplicateMatch};
use serde::Deserialize;
use std::path::PathBuf;
use telemetry::TelemetrySettings;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub storage: StorageSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding the exported files. Relative paths are resolved
    /// against the working directory.
    pub base_path: PathBuf,
    pub token_seed: String,
    /// Overrides the token derived from `token_seed`.
    pub token: Option<String>,
    #[serde(default)]
    pub duplicate_match: DuplicateMatch,
    pub writer_queue_capacity: usize,
}

impl StorageSettings {
    pub fn artifact_token(&self) -> Result<ArtifactToken, String> {
        match &self.token {
            Some(token) => ArtifactToken::parse(token.clone()),
            None => Ok(ArtifactToken::derive(&self.token_seed)),
        }
    }

    pub fn resolved_base_path(&self) -> Result<PathBuf, std::io::Error> {
        if self.base_path.is_absolute() {
            Ok(self.base_path.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.base_path))
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;

    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let environment_filename = format!("{}.yaml", environment.as_str());

    // Init configuration reader
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001 would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either local or production",
                other
            )),
        }
    }
}
