//! Server configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields a working local setup:
//!
//! ```toml
//! game_addr = "0.0.0.0:6968"
//! chat_addr = "0.0.0.0:6972"
//! handshake_timeout_secs = 5
//! idle_timeout_secs = 300
//! confirmation_ttl_secs = 300
//! catalog_dir = "data/catalogs"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use feralhost_transport::DEFAULT_MAX_FRAME_LEN;
use serde::{Deserialize, Serialize};

/// Errors raised while loading a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for both servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the game (XT) server listens on.
    pub game_addr: String,

    /// Address the chat server listens on.
    pub chat_addr: String,

    /// How long a new connection has to present its session token.
    pub handshake_timeout_secs: u64,

    /// A connection that sends nothing for this long is closed.
    pub idle_timeout_secs: u64,

    /// Lifetime of a login-confirmation token.
    pub confirmation_ttl_secs: u64,

    /// Largest accepted frame, in bytes.
    pub max_frame_len: usize,

    /// Directory holding `avatarhelper.json`, `clothinghelper.json` and
    /// `dyehelper.json`. Without one the catalogs start empty.
    pub catalog_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            game_addr: "0.0.0.0:6968".to_string(),
            chat_addr: "0.0.0.0:6972".to_string(),
            handshake_timeout_secs: 5,
            idle_timeout_secs: 300,
            confirmation_ttl_secs: 300,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            catalog_dir: None,
        }
    }
}

impl ServerConfig {
    /// Parses a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn confirmation_ttl(&self) -> Duration {
        Duration::from_secs(self.confirmation_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_from_toml_str_empty_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.idle_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_from_toml_str_overrides_selected_keys() {
        let config = ServerConfig::from_toml_str(
            r#"
            game_addr = "127.0.0.1:7000"
            confirmation_ttl_secs = 60
            catalog_dir = "data"
            "#,
        )
        .unwrap();

        assert_eq!(config.game_addr, "127.0.0.1:7000");
        assert_eq!(config.chat_addr, ServerConfig::default().chat_addr);
        assert_eq!(config.confirmation_ttl(), Duration::from_secs(60));
        assert_eq!(config.catalog_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_from_toml_str_wrong_type_is_parse_error() {
        let result = ServerConfig::from_toml_str("idle_timeout_secs = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "handshake_timeout_secs = 2").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.handshake_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
