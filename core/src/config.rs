//! Martin configuration.
//!
//! Loaded from `$MARTIN_HOME/config.toml` (`~/.martin/config.toml` when
//! `MARTIN_HOME` is unset). A missing file yields the defaults.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::error::RemoteError;

/// Environment variable overriding the Martin home directory.
pub const MARTIN_HOME_ENV: &str = "MARTIN_HOME";

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MartinConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

fn default_log_level() -> String {
    "martin_core=info,martin_tui=info,martin_people_client=info".to_string()
}

impl Default for MartinConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            directory: DirectoryConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Where the contacts live and how to authenticate.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DirectoryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connections requested per page on bulk load.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Environment variable holding an OAuth bearer token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// File holding the bearer token, read when the variable is unset.
    #[serde(default)]
    pub access_token_file: Option<String>,
}

fn default_base_url() -> String {
    "https://people.googleapis.com".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_access_token_env() -> String {
    "MARTIN_ACCESS_TOKEN".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            access_token_env: default_access_token_env(),
            access_token_file: None,
        }
    }
}

impl DirectoryConfig {
    /// Bearer token from the configured variable, else the configured file.
    pub fn resolve_access_token(&self) -> Result<String, RemoteError> {
        if let Ok(token) = std::env::var(&self.access_token_env) {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        let Some(file) = self.access_token_file.as_deref() else {
            return Err(RemoteError::Credentials(format!(
                "set {} or directory.access_token_file",
                self.access_token_env
            )));
        };
        let path = expand_home(file);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            RemoteError::Credentials(format!("failed to read {}: {e}", path.display()))
        })?;
        let token = contents.trim();
        if token.is_empty() {
            return Err(RemoteError::Credentials(format!(
                "{} is empty",
                path.display()
            )));
        }
        Ok(token.to_string())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    /// Note written by the birthday acknowledgment shortcut.
    #[serde(default = "default_birthday_note")]
    pub birthday_note: String,
}

fn default_birthday_note() -> String {
    "Birthday text".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            birthday_note: default_birthday_note(),
        }
    }
}

impl MartinConfig {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => martin_home()?.join(CONFIG_FILENAME),
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// `$MARTIN_HOME`, or `~/.martin`.
pub fn martin_home() -> Result<PathBuf, ConfigError> {
    if let Ok(home) = std::env::var(MARTIN_HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|h| h.join(".martin"))
        .ok_or(ConfigError::NoHome)
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: MartinConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, MartinConfig::default());
        assert_eq!(cfg.directory.page_size, 1000);
        assert_eq!(cfg.ui.birthday_note, "Birthday text");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: MartinConfig = toml::from_str(
            r#"
            log_level = "debug"

            [directory]
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.directory.base_url, "http://localhost:9000");
        assert_eq!(cfg.directory.access_token_env, "MARTIN_ACCESS_TOKEN");
        assert_eq!(cfg.ui, UiConfig::default());
    }

    #[test]
    fn load_reads_file_and_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(
            MartinConfig::load(Some(&missing)).unwrap(),
            MartinConfig::default()
        );

        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[ui]\nbirthday_note = \"Happy birthday!\"\n").unwrap();
        let cfg = MartinConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.ui.birthday_note, "Happy birthday!");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[directory]\npage_size = \"lots\"\n").unwrap();
        let err = MartinConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn token_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "  ya29.secret\n").unwrap();
        let cfg = DirectoryConfig {
            access_token_env: "MARTIN_TEST_TOKEN_UNSET_VAR".to_string(),
            access_token_file: Some(token_path.display().to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.resolve_access_token().unwrap(), "ya29.secret");
    }

    #[test]
    fn missing_token_is_a_credentials_error() {
        let cfg = DirectoryConfig {
            access_token_env: "MARTIN_TEST_TOKEN_ALSO_UNSET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.resolve_access_token(),
            Err(RemoteError::Credentials(_))
        ));
    }
}
