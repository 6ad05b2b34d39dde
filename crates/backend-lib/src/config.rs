// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, lowest to highest precedence: built-in defaults, a TOML file,
//! `TODO_`-prefixed environment variables (`__` separates nested keys), and the
//! bare `JWT_SECRET` / `FRONTEND_URL` variables.
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";

/// Minimum signing secret length in bytes (HS256 key size)
pub const MIN_SECRET_LENGTH: usize = 32;

const KNOWN_PLACEHOLDERS: &[&str] = &[
    "your-secret-key",
    "change-in-production",
    "changeme",
    "change-me",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("no signing secret configured; set auth.jwt_secret, TODO_AUTH__JWT_SECRET or JWT_SECRET")]
    MissingSecret,

    #[error("signing secret must be at least {} bytes, got {}", MIN_SECRET_LENGTH, .0)]
    WeakSecret(usize),

    #[error("signing secret is a well-known placeholder")]
    PlaceholderSecret,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which storage backend to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory only; everything is lost on restart
    Memory,
    /// JSON snapshot under `data_dir`
    File,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Storage backend
    pub storage: StorageBackend,
    /// Log level, overridden by `RUST_LOG` when set
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
    /// Authentication settings
    pub auth: AuthSettings,
}

/// Authentication settings
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret. Required; there is no fallback.
    pub jwt_secret: Option<String>,
    /// Password hashing cost and concurrency
    pub hashing: HashingSettings,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("hashing", &self.hashing)
            .finish()
    }
}

/// scrypt cost parameters and the cap on concurrent hash operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    /// log2 of the scrypt CPU/memory cost
    pub log_n: u8,
    /// scrypt block size
    pub r: u32,
    /// scrypt parallelism
    pub p: u32,
    /// Maximum number of hash/verify operations running at once
    pub max_concurrent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: PathBuf::from("data"),
            storage: StorageBackend::File,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cors_origin: "http://localhost:5173".to_string(),
            auth: AuthSettings::default(),
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            log_n: 15,
            r: 8,
            p: 1,
            max_concurrent: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl Settings {
    /// Layered configuration sources
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("TODO_").split("__"))
            .merge(Env::raw().only(&["JWT_SECRET"]).map(|_| "auth.jwt_secret".into()))
            .merge(Env::raw().only(&["FRONTEND_URL"]).map(|_| "cors_origin".into()))
    }

    /// Load and validate settings
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(config_path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the server must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt_secret()?;

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!("unknown level {:?}", self.log_level),
            });
        }

        let hashing = &self.auth.hashing;
        if hashing.max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                field: "auth.hashing.max_concurrent",
                reason: "must be at least 1".to_string(),
            });
        }
        crate::auth::password::scrypt_params(hashing).map_err(|e| ConfigError::Invalid {
            field: "auth.hashing",
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// The signing secret, checked against the secret policy
    pub fn jwt_secret(&self) -> Result<&str, ConfigError> {
        let secret = self
            .auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret(secret.len()));
        }

        let lowered = secret.to_lowercase();
        if KNOWN_PLACEHOLDERS.iter().any(|p| lowered.contains(p)) {
            return Err(ConfigError::PlaceholderSecret);
        }

        Ok(secret)
    }
}
