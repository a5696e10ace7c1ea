//! Persisted config (data root, query defaults, artifact file names) in the app data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;
use crate::engine::{DEFAULT_RECOMMENDATIONS, DEFAULT_SUGGESTIONS};

const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the configured data root.
pub const DATA_ROOT_ENV: &str = "FOLIO_DATA";
/// Titles offered when a query matches nothing.
pub const DEFAULT_FALLBACK_SUGGESTIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the artifacts written by the training pipeline.
    pub data_root: Option<String>,
    pub recommendations: usize,
    pub suggestions: usize,
    pub fallback_suggestions: usize,
    pub artifacts: ArtifactNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            recommendations: DEFAULT_RECOMMENDATIONS,
            suggestions: DEFAULT_SUGGESTIONS,
            fallback_suggestions: DEFAULT_FALLBACK_SUGGESTIONS,
            artifacts: ArtifactNames::default(),
        }
    }
}

/// File names of the artifacts inside the data root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    pub popular: String,
    pub catalog: String,
    pub ratings: String,
    pub similarity: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            popular: "popular_books.csv".to_string(),
            catalog: "books.csv".to_string(),
            ratings: "final_ratings_table.csv".to_string(),
            similarity: "similarity_score.csv".to_string(),
        }
    }
}

/// Load config from the app data directory. Returns default config if missing or invalid.
pub fn load_config() -> Config {
    match app_data::app_data_dir() {
        Some(dir) => load_config_in(&dir),
        None => Config::default(),
    }
}

/// Load `config.toml` from `dir`, falling back to defaults.
pub fn load_config_in(dir: &Path) -> Config {
    match std::fs::read_to_string(dir.join(CONFIG_FILENAME)) {
        Ok(s) => parse_config(&s),
        Err(_) => Config::default(),
    }
}

fn parse_config(s: &str) -> Config {
    toml::from_str(s).unwrap_or_else(|e| {
        tracing::warn!("ignoring invalid {CONFIG_FILENAME}: {e}");
        Config::default()
    })
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let dir = app_data::app_data_dir().ok_or(ConfigError::NoDataDir)?;
    save_config_in(&dir, config)
}

/// Write `config` as `config.toml` inside `dir`.
pub fn save_config_in(dir: &Path, config: &Config) -> Result<(), ConfigError> {
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(dir.join(CONFIG_FILENAME), s).map_err(ConfigError::Write)
}

/// The data root: `FOLIO_DATA` if set, else the configured one, if any.
pub fn get_data_root() -> Option<PathBuf> {
    std::env::var_os(DATA_ROOT_ENV)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            load_config()
                .data_root
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        })
}

/// Set and persist the data root.
pub fn set_data_root(path: &Path) -> Result<(), ConfigError> {
    let path = path.canonicalize().map_err(ConfigError::Canonicalize)?;
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }
    let mut config = load_config();
    config.data_root = Some(path.to_string_lossy().into_owned());
    save_config(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
    #[error("failed to resolve path: {0}")]
    Canonicalize(std::io::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config("data_root = \"/srv/books\"\n[artifacts]\ncatalog = \"Books.csv\"\n");
        assert_eq!(config.data_root.as_deref(), Some("/srv/books"));
        assert_eq!(config.recommendations, 7);
        assert_eq!(config.fallback_suggestions, 20);
        assert_eq!(config.artifacts.catalog, "Books.csv");
        assert_eq!(config.artifacts.similarity, "similarity_score.csv");
    }

    #[test]
    fn invalid_config_falls_back_to_default() {
        assert_eq!(parse_config("recommendations = \"many\""), Config::default());
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config_in(dir.path()), Config::default());

        let config = Config {
            data_root: Some("/data".into()),
            suggestions: 5,
            artifacts: ArtifactNames {
                similarity: "sim.csv".into(),
                ..ArtifactNames::default()
            },
            ..Config::default()
        };
        save_config_in(dir.path(), &config).unwrap();
        assert_eq!(load_config_in(dir.path()), config);
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        assert!(matches!(
            save_config_in(&gone, &Config::default()),
            Err(ConfigError::Write(_))
        ));
    }

    #[test]
    fn set_data_root_rejects_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            set_data_root(file.path()),
            Err(ConfigError::NotADirectory(_))
        ));
    }
}
