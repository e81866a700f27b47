//! TOML configuration for the feedback window.
//!
//! The file lives at `<app root>/config.toml`. A missing file, or missing
//! keys within it, fall back to the defaults that target the upstream
//! repository.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::app_dirs;

/// Default filename used to store the configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// REST API root issues are created against.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Repository receiving feedback issues.
pub const DEFAULT_REPOSITORY: &str = "lwouis/alt-tab-macos";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to resolve config directory: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid api_base {value:?}: {source}")]
    ApiBase {
        value: String,
        source: url::ParseError,
    },
    #[error("Invalid repository {0:?}; expected `owner/name`")]
    Repository(String),
}

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Root of the REST API, without a trailing path.
    pub api_base: String,
    /// `owner/name` of the repository receiving issues.
    pub repository: String,
    /// Initial state of the "send debug profile" checkbox.
    pub include_debug_profile: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            include_debug_profile: true,
        }
    }
}

impl FeedbackConfig {
    /// Endpoint issues are POSTed to: `<api_base>/repos/<repository>/issues`.
    pub fn issues_endpoint(&self) -> Result<Url, ConfigError> {
        let repository = self.validated_repository()?;
        let raw = format!(
            "{}/repos/{repository}/issues",
            self.api_base.trim_end_matches('/')
        );
        Url::parse(&raw).map_err(|source| ConfigError::ApiBase {
            value: self.api_base.clone(),
            source,
        })
    }

    /// Browser page listing the repository's existing issues.
    pub fn issues_page_url(&self) -> String {
        format!("https://github.com/{}/issues", self.repository.trim())
    }

    fn validated_repository(&self) -> Result<&str, ConfigError> {
        let repository = self.repository.trim();
        let valid = repository
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if valid {
            Ok(repository)
        } else {
            Err(ConfigError::Repository(self.repository.clone()))
        }
    }
}

/// Resolve the configuration file path inside the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<FeedbackConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load configuration from a specific path, returning defaults if missing.
pub fn load_from(path: &Path) -> Result<FeedbackConfig, ConfigError> {
    if !path.exists() {
        return Ok(FeedbackConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FeedbackConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    config.issues_endpoint()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_endpoint_targets_upstream_issues() {
        let endpoint = FeedbackConfig::default().issues_endpoint().unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://api.github.com/repos/lwouis/alt-tab-macos/issues"
        );
        assert_eq!(
            FeedbackConfig::default().issues_page_url(),
            "https://github.com/lwouis/alt-tab-macos/issues"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, FeedbackConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "include_debug_profile = false\n").unwrap();
        let config = load_from(&path).unwrap();
        assert!(!config.include_debug_profile);
        assert_eq!(config.repository, DEFAULT_REPOSITORY);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn trailing_slash_in_api_base_is_ignored() {
        let config = FeedbackConfig {
            api_base: "http://127.0.0.1:8080/".into(),
            repository: "me/app".into(),
            include_debug_profile: true,
        };
        assert_eq!(
            config.issues_endpoint().unwrap().as_str(),
            "http://127.0.0.1:8080/repos/me/app/issues"
        );
    }

    #[test]
    fn rejects_malformed_repository() {
        for repository in ["", "noslash", "/name", "owner/", "a/b/c"] {
            let config = FeedbackConfig {
                repository: repository.into(),
                ..FeedbackConfig::default()
            };
            assert!(
                matches!(config.issues_endpoint(), Err(ConfigError::Repository(_))),
                "{repository:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "repository = [").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn load_or_default_reads_from_app_root() {
        let base = tempdir().unwrap();
        let _guard = app_dirs::ConfigBaseGuard::set(base.path().to_path_buf());
        let path = config_path().unwrap();
        assert_eq!(path.parent(), Some(app_dirs::app_root_dir().unwrap().as_path()));
        std::fs::write(&path, "repository = \"acme/widgets\"\n").unwrap();
        assert_eq!(load_or_default().unwrap().repository, "acme/widgets");
    }
}
