use std::{
    fs, io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Settings for the HTTP server.
///
/// Read from a TOML file; missing keys take their defaults.
///
/// ```toml
/// host = "0.0.0.0"
/// port = 8080
/// body_limit = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit: u64,
}

/// Errors that can occur when loading a [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid server config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3030,
            body_limit: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(ServerConfig::from_toml("").expect("valid"), ServerConfig::default());
    }

    #[test]
    fn overrides_selected_keys() {
        let config = ServerConfig::from_toml("host = \"0.0.0.0\"\nport = 8080\n").expect("valid");

        assert_eq!(config.addr(), "0.0.0.0:8080".parse().expect("valid addr"));
        assert_eq!(config.body_limit, ServerConfig::default().body_limit);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            ServerConfig::from_toml("prot = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ServerConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
