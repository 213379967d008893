use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use autobazaar_core::tokens::DEFAULT_TOKEN_TTL_HOURS;

use crate::middleware::rate_limit::RateLimitConfig;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests at shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub database_url: String,
    /// Pool size (default: `10`).
    pub db_max_connections: u32,
    /// Lifetime of an authentication token (default: `24`).
    pub token_ttl_hours: i64,
    /// How long the home feed is served from cache (default: `60`).
    pub home_feed_ttl_secs: u64,
    /// Directory reference snapshots are written to (default: `./data`).
    pub snapshot_dir: PathBuf,
    pub log_format: LogFormat,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`          | required                   |
    /// | `DB_MAX_CONNECTIONS`    | `10`                       |
    /// | `TOKEN_TTL_HOURS`       | `24`                       |
    /// | `HOME_FEED_TTL_SECS`    | `60`                       |
    /// | `SNAPSHOT_DIR`          | `./data`                   |
    /// | `LOG_FORMAT`            | `pretty` (or `json`)       |
    /// | `RATE_LIMIT_ENABLED`    | `true`                     |
    /// | `RATE_LIMIT_RPS`        | `2`                        |
    /// | `RATE_LIMIT_BURST`      | `4`                        |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_var("PORT", 3000u16)?;

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_var("SHUTDOWN_TIMEOUT_SECS", 30u64)?;

        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 10u32)?;

        let token_ttl_hours = parse_var("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        anyhow::ensure!(token_ttl_hours > 0, "TOKEN_TTL_HOURS must be positive");
        let home_feed_ttl_secs = parse_var("HOME_FEED_TTL_SECS", 60u64)?;

        let snapshot_dir = std::env::var("SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => anyhow::bail!("LOG_FORMAT must be `pretty` or `json`, got `{other}`"),
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            enabled: parse_var("RATE_LIMIT_ENABLED", defaults.enabled)?,
            requests_per_second: parse_var("RATE_LIMIT_RPS", defaults.requests_per_second)?,
            burst_size: parse_var("RATE_LIMIT_BURST", defaults.burst_size)?,
        };
        anyhow::ensure!(
            rate_limit.requests_per_second > 0 && rate_limit.burst_size > 0,
            "RATE_LIMIT_RPS and RATE_LIMIT_BURST must be positive"
        );

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            db_max_connections,
            token_ttl_hours,
            home_feed_ttl_secs,
            snapshot_dir,
            log_format,
            rate_limit,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
