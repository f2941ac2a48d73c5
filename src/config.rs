//! Configuration management for the RAX account server
//!
//! Values are layered: built-in defaults, then `config.toml` (optional), then
//! `ACCOUNTS_*` environment variables, then a bare `PORT` variable.

use config::{Config, Environment, File, Map};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::account::CredentialHasher;

/// Complete server configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ServerConfig {
    pub server: NetworkConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

/// Listener and session limits
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkConfig {
    /// IP address to bind
    pub bind_address: String,

    /// Listening port. Environment: ACCOUNTS_SERVER__PORT or PORT
    pub port: u16,

    /// Maximum concurrently connected clients
    pub max_clients: usize,

    /// Maximum request line length in bytes, terminator included
    pub max_request_length: usize,

    /// Idle sessions are closed after this many seconds
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: String,
}

/// Input limits and password hashing cost
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    pub max_field_length: usize,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            max_clients: 64,
            max_request_length: 4096,
            idle_timeout_secs: 300,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./db.sqlite".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        // argon2 crate defaults (19 MiB, 2 passes, 1 lane)
        Self {
            max_field_length: 256,
            hash_memory_kib: 19 * 1024,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl ServerConfig {
    /// Load configuration from ./config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            File::with_name("config").required(false),
            std::env::vars().collect(),
        )
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(
            File::from(path.as_ref()).required(true),
            std::env::vars().collect(),
        )
    }

    fn build<F>(file: F, env: Map<String, String>) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let port_override = env.get("PORT").and_then(|raw| match raw.parse::<u16>() {
            Ok(port) => Some(i64::from(port)),
            Err(_) => {
                warn!("Ignoring PORT={:?}: not a valid port number", raw);
                None
            }
        });

        let settings = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("ACCOUNTS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .set_override_option("server.port", port_override)?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_request_length < 64 {
            return Err(config::ConfigError::Message(
                "max_request_length must be at least 64 bytes".into(),
            ));
        }

        if self.storage.database_path.is_empty() {
            return Err(config::ConfigError::Message(
                "database_path cannot be empty".into(),
            ));
        }

        if self.security.max_field_length == 0 {
            return Err(config::ConfigError::Message(
                "max_field_length must be greater than 0".into(),
            ));
        }

        self.security
            .hasher()
            .map_err(|e| config::ConfigError::Message(format!("invalid hash parameters: {}", e)))?;

        Ok(())
    }
}

impl NetworkConfig {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}

impl SecurityConfig {
    /// Build the password hasher for these cost parameters
    pub fn hasher(&self) -> Result<CredentialHasher, crate::error::AccountError> {
        CredentialHasher::new(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
        )
    }
}
