use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::lifecycle::{DEFAULT_EXPIRY_GRACE_DAYS, DEFAULT_RETENTION_DAYS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Typed application settings, loaded once at startup from the
/// environment (`.env` is read before this via dotenv).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Base URL under which this service is reachable; blob public URLs
    /// are derived from it
    pub public_base_url: String,

    /// SeaORM connection string
    pub database_url: String,

    /// Directory holding uploaded image blobs
    pub media_dir: PathBuf,

    /// Bearer token required on every admin endpoint
    pub admin_token: String,

    /// Resend API key; reservation emails are skipped when absent
    pub resend_api_key: Option<String>,

    /// Sender address for reservation emails
    pub notify_from: String,

    /// Operator address receiving reservation emails
    pub notify_to: String,

    /// Days before an unreserved item expires
    pub retention_days: i64,

    /// Days an expired item stays visible before dropping out of fetches
    pub expiry_grace_days: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            database_url: env_or("DATABASE_URL", "sqlite://lostfound.db?mode=rwc"),
            media_dir: PathBuf::from(env_or("MEDIA_DIR", "media")),
            admin_token: env::var("ADMIN_TOKEN").map_err(|_| ConfigError::Missing("ADMIN_TOKEN"))?,
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|v| !v.is_empty()),
            notify_from: env_or("NOTIFY_EMAIL_FROM", "Lost & Found <onboarding@resend.dev>"),
            notify_to: env_or("NOTIFY_EMAIL_TO", "operator@example.com"),
            retention_days: env_days("RETENTION_DAYS", DEFAULT_RETENTION_DAYS)?,
            expiry_grace_days: env_days("EXPIRY_GRACE_DAYS", DEFAULT_EXPIRY_GRACE_DAYS)?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_days(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => value
            .parse::<i64>()
            .ok()
            .filter(|d| *d >= 0)
            .ok_or(ConfigError::Invalid { name, value }),
    }
}
