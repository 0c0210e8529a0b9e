use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

const DEV_SECRET: &str = "dev-secret-change-me";

/// Placeholder JWT secrets that are refused unless explicitly allowed.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", DEV_SECRET];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("WARBLER_JWT_SECRET is unset or a placeholder; set it or WARBLER_ALLOW_DEV_SECRET=1")]
    PlaceholderSecret,

    #[error("WARBLER_BCRYPT_COST must be between 4 and 31, got {0}")]
    BcryptCost(u32),

    #[error("WARBLER_SESSION_DAYS must be between 1 and 3650, got {0}")]
    SessionDays(i64),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub session_days: i64,
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allow_dev_secret = lookup("WARBLER_ALLOW_DEV_SECRET").is_some_and(|v| v == "1");
        let jwt_secret = match lookup("WARBLER_JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) if !PLACEHOLDER_SECRETS.contains(&secret.as_str()) => secret,
            _ if allow_dev_secret => {
                warn!("Using the development JWT secret; sessions are forgeable");
                DEV_SECRET.to_string()
            }
            _ => return Err(ConfigError::PlaceholderSecret),
        };

        let bcrypt_cost = parse_or(&lookup, "WARBLER_BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::BcryptCost(bcrypt_cost));
        }

        let session_days = parse_or(&lookup, "WARBLER_SESSION_DAYS", 30)?;
        if !(1..=3650).contains(&session_days) {
            return Err(ConfigError::SessionDays(session_days));
        }

        Ok(Self {
            host: lookup("WARBLER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "WARBLER_PORT", 3000)?,
            db_path: lookup("WARBLER_DB_PATH")
                .unwrap_or_else(|| "warbler.db".into())
                .into(),
            jwt_secret,
            session_days,
            bcrypt_cost,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
