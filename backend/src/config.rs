//! Application settings loaded via OrthoConfig.
//!
//! Every field can be given as a `--flag`, a `CATALOGUE_*` environment
//! variable or a configuration file entry. Session settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Catalogue file imported when no path is configured.
pub const DEFAULT_IMPORT_PATH: &str = "Cars Datasets 2025.csv";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Problems with the loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured, or it was blank.
    #[error("database_url is required (set CATALOGUE_DATABASE_URL or --database-url)")]
    MissingDatabaseUrl,
    /// The bind address does not parse as `host:port`.
    #[error("bind_addr '{value}' is not a socket address")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
    },
    /// A pool with no connections cannot serve requests.
    #[error("db_max_connections must be at least 1")]
    ZeroConnections,
}

/// Settings shared by the server and the `import-catalogue` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Catalogue CSV imported by `POST /api/v1/import` and the CLI.
    pub import_path: Option<PathBuf>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl AppSettings {
    /// Listening address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// [`SettingsError::InvalidBindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Database URL; there is no default.
    ///
    /// # Errors
    /// [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Catalogue file to import, falling back to [`DEFAULT_IMPORT_PATH`].
    pub fn import_path(&self) -> PathBuf {
        self.import_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMPORT_PATH))
    }

    /// Pool size.
    ///
    /// # Errors
    /// [`SettingsError::ZeroConnections`] when configured as zero.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections {
            0 => Err(SettingsError::ZeroConnections),
            max => Ok(max),
        }
    }
}
