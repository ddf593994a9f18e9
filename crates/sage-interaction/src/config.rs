//! Dialogue runtime configuration loading.
//!
//! Credential priority: `~/.config/sage/secret.json` first, environment
//! variables second. The secret file is read-only plaintext JSON; there is
//! no write path.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sage_core::{Result, SageError};
use serde::Deserialize;

use crate::client::DEFAULT_BASE_URL;

const API_KEY_ENV: &str = "SAGE_DIALOGUE_API_KEY";
const VERSION_ID_ENV: &str = "SAGE_DIALOGUE_VERSION_ID";
const BASE_URL_ENV: &str = "SAGE_DIALOGUE_BASE_URL";

/// Resolved configuration for [`crate::DialogueClient`].
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    pub api_key: String,
    pub version_id: Option<String>,
    pub base_url: String,
}

/// Shape of `secret.json`.
#[derive(Debug, Default, Deserialize)]
struct SecretFile {
    #[serde(default)]
    dialogue: Option<DialogueSecret>,
}

#[derive(Debug, Deserialize)]
struct DialogueSecret {
    api_key: String,
    #[serde(default)]
    version_id: Option<String>,
}

impl DialogueConfig {
    /// Loads configuration from `~/.config/sage/secret.json` or environment
    /// variables.
    ///
    /// Priority:
    /// 1. `~/.config/sage/secret.json` (`dialogue` entry)
    /// 2. Environment variables (`SAGE_DIALOGUE_API_KEY`,
    ///    `SAGE_DIALOGUE_VERSION_ID`)
    ///
    /// The endpoint defaults to the public runtime and can be overridden
    /// with `SAGE_DIALOGUE_BASE_URL` in either case.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_sources(default_secret_path())
    }

    fn try_from_sources(secret_path: Option<PathBuf>) -> Result<Self> {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        if let Some(secret) = secret_path.as_deref().and_then(load_secret_file) {
            return Ok(Self {
                api_key: secret.api_key,
                version_id: secret.version_id,
                base_url,
            });
        }

        let api_key = env::var(API_KEY_ENV).map_err(|_| {
            let secret_hint = secret_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.config/sage/secret.json".to_string());
            SageError::config(format!(
                "{API_KEY_ENV} not set and no dialogue entry in {secret_hint}"
            ))
        })?;
        let version_id = env::var(VERSION_ID_ENV).ok();

        Ok(Self {
            api_key,
            version_id,
            base_url,
        })
    }
}

fn default_secret_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sage").join("secret.json"))
}

fn load_secret_file(path: &Path) -> Option<DialogueSecret> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<SecretFile>(&contents) {
        Ok(parsed) => parsed.dialogue,
        Err(err) => {
            tracing::warn!(target: "dialogue", "ignoring unparseable secret file {}: {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(
            &path,
            r#"{"dialogue":{"api_key":"file-key","version_id":"v12"}}"#,
        )
        .unwrap();

        let config = DialogueConfig::try_from_sources(Some(path)).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.version_id.as_deref(), Some("v12"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_secret_file_without_dialogue_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"other":{"api_key":"nope"}}"#).unwrap();

        // Falls through to the environment, which does not define the key
        // in the test environment.
        let err = DialogueConfig::try_from_sources(Some(path)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_unparseable_secret_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, "not json at all").unwrap();

        let err = DialogueConfig::try_from_sources(Some(path)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_missing_everything_names_both_sources() {
        let err = DialogueConfig::try_from_sources(Some(PathBuf::from(
            "/nonexistent/sage/secret.json",
        )))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains(API_KEY_ENV));
        assert!(message.contains("secret.json"));
    }
}
