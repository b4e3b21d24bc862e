use std::path::{Path, PathBuf};

use grievance_common::config::ClassifierConfig;
use grievance_common::GrievanceError;

use super::validation;

/// Load classifier configuration from a TOML file.
///
/// Missing sections take their defaults. Fails loudly on unreadable,
/// unparseable or invalid files; callers refuse to start on error.
pub fn load_config(path: &Path) -> Result<ClassifierConfig, ConfigError> {
    tracing::info!(path = %path.display(), "Loading classifier configuration");

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ClassifierConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    validation::validate(&config)?;

    tracing::info!(
        rules = config.rules.len(),
        urgency_markers = config.urgency_markers.len(),
        builtin_rules = config.rules.is_empty(),
        "Classifier configuration loaded"
    );

    Ok(config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for GrievanceError {
    fn from(e: ConfigError) -> Self {
        GrievanceError::Config(e.to_string())
    }
}
