//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use inkwell_core::services::SessionConfig;
use inkwell_infra::database::DatabaseConfig;
use inkwell_infra::{JwtConfig, MediaConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the site on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig::default(),
            session: SessionConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

/// Longest accepted session lifetimes; larger settings are clamped.
const MAX_SESSION_HOURS: u64 = 24 * 366;
const MAX_REMEMBER_DAYS: u64 = 3650;

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: env_parse("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let jwt = JwtConfig::from_env();
        let remember_days = env_parse("REMEMBER_DAYS").unwrap_or(30);
        let session = session_config(jwt.expiration_hours, remember_days);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
            database,
            jwt,
            session,
            media: MediaConfig::from_env(),
        }
    }
}

fn session_config(session_hours: i64, remember_days: u64) -> SessionConfig {
    let session_hours = u64::try_from(session_hours)
        .unwrap_or(24)
        .clamp(1, MAX_SESSION_HOURS);
    let remember_days = remember_days.clamp(1, MAX_REMEMBER_DAYS);

    SessionConfig {
        ttl: Duration::from_secs(session_hours * 3600),
        remember_ttl: Duration::from_secs(remember_days * 24 * 3600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_converts_units() {
        let session = session_config(2, 7);
        assert_eq!(session.ttl, Duration::from_secs(2 * 3600));
        assert_eq!(session.remember_ttl, Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_session_config_clamps_out_of_range_values() {
        let huge = session_config(i64::MAX, u64::MAX);
        assert_eq!(huge.ttl, Duration::from_secs(MAX_SESSION_HOURS * 3600));
        assert_eq!(
            huge.remember_ttl,
            Duration::from_secs(MAX_REMEMBER_DAYS * 24 * 3600)
        );

        let negative = session_config(-5, 0);
        assert_eq!(negative.ttl, Duration::from_secs(24 * 3600));
        assert_eq!(negative.remember_ttl, Duration::from_secs(24 * 3600));
    }
}
