use serde::Deserialize;
use thiserror::Error;

/// Shortest signing secret accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest token or invite lifetime accepted, one year.
pub const MAX_EXPIRY_MINUTES: u64 = 525_600;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Value of `Access-Control-Allow-Origin` on every response.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime of the `auth` and `state` cookies.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: u64,
    #[serde(default = "default_invite_expiry")]
    pub invite_expiry_minutes: u64,
    #[serde(default = "default_max_boards")]
    pub max_boards_per_team: u32,
    /// HMAC key for every token the server signs.
    ///
    /// `JWT_SECRET` in the environment wins over this field. Read once at
    /// startup; rotating it logs every user out.
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"127.0.0.1:8080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_connections: default_max_connections(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_pool_size(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

impl AuthConfig {
    /// `None` when the value does not fit in seconds.
    pub fn token_expiry_secs(&self) -> Option<i64> {
        minutes_to_secs(self.token_expiry_minutes)
    }

    pub fn invite_expiry_secs(&self) -> Option<i64> {
        minutes_to_secs(self.invite_expiry_minutes)
    }

    /// Resolve the signing secret, `JWT_SECRET` env var first.
    ///
    /// Returns `None` when neither source is set.
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        self.resolve_secret(std::env::var("JWT_SECRET").ok())
    }

    /// Precedence rule behind [`resolved_jwt_secret`](Self::resolved_jwt_secret).
    pub fn resolve_secret(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|s| !s.is_empty())
            .or_else(|| self.jwt_secret.clone())
            .filter(|s| !s.is_empty())
    }
}

fn minutes_to_secs(minutes: u64) -> Option<i64> {
    minutes
        .checked_mul(60)
        .and_then(|secs| i64::try_from(secs).ok())
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_bind() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_max_connections() -> usize {
    1000
}

pub fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

pub fn default_database_url() -> String {
    "sqlite://taskboard.db".to_string()
}

pub fn default_pool_size() -> u32 {
    5
}

pub fn default_acquire_timeout() -> u64 {
    5
}

pub fn default_token_expiry() -> u64 {
    60
}

pub fn default_invite_expiry() -> u64 {
    60 * 24
}

pub fn default_max_boards() -> u32 {
    3
}
