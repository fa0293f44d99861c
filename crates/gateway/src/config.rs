//! Gateway configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use auth_service_lib::config::{AuthConfig, ConfigError, DEFAULT_OPERATION_TIMEOUT_MS};
use common::{DatabaseConfig, HashingConfig, JwtConfig, ServiceConfig};
use domain::{HashAlgorithm, DEFAULT_HASH_COST, DEFAULT_JWT_EXPIRATION_HOURS};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address and logging
    pub service: ServiceConfig,
    /// Account database
    pub database: DatabaseConfig,
    /// Settings handed to the auth service
    pub auth: AuthConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            ..defaults
        };

        let database = database_from_lookup(&lookup)?;

        let timeout_ms: u64 = parse_or(&lookup, "AUTH_TIMEOUT_MS", DEFAULT_OPERATION_TIMEOUT_MS)?;

        let auth = AuthConfig {
            jwt: JwtConfig {
                secret: lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
                expiration_hours: parse_or(
                    &lookup,
                    "JWT_EXPIRATION_HOURS",
                    DEFAULT_JWT_EXPIRATION_HOURS,
                )?,
            },
            hashing: HashingConfig {
                algorithm: parse_or(&lookup, "HASH_ALGORITHM", HashAlgorithm::default())?,
                cost: parse_or(&lookup, "HASH_COST", DEFAULT_HASH_COST)?,
            },
            operation_timeout: Duration::from_millis(timeout_ms),
        };
        auth.validate()?;

        Ok(Self {
            service,
            database,
            auth,
        })
    }
}

/// Database settings only, for the migration commands.
pub fn database_from_env() -> Result<DatabaseConfig, ConfigError> {
    database_from_lookup(&|name: &str| env::var(name).ok())
}

fn database_from_lookup<F>(lookup: &F) -> Result<DatabaseConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = DatabaseConfig::default();
    Ok(DatabaseConfig {
        url: lookup("DATABASE_URL").unwrap_or(defaults.url),
        max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
        min_connections: parse_or(lookup, "DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
    })
}

/// Parse a variable if present; a present but malformed value is an error.
fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.service.port, 3000);
        assert_eq!(config.auth.jwt.expiration_hours, 24);
        assert_eq!(config.auth.hashing.algorithm, HashAlgorithm::Bcrypt);
        assert_eq!(config.auth.hashing.cost, 10);
        assert_eq!(config.auth.operation_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();

        assert!(!format!("{:?}", config).contains(SECRET));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("JWT_SECRET", SECRET),
            ("PORT", "8080"),
            ("HASH_ALGORITHM", "argon2"),
            ("JWT_EXPIRATION_HOURS", "1"),
            ("AUTH_TIMEOUT_MS", "250"),
            ("DATABASE_URL", "sqlite::memory:"),
        ])
        .unwrap();

        assert_eq!(config.service.port, 8080);
        assert_eq!(config.auth.hashing.algorithm, HashAlgorithm::Argon2);
        assert_eq!(config.auth.jwt.expiration_hours, 1);
        assert_eq!(config.auth.operation_timeout, Duration::from_millis(250));
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_large_timeout_is_not_truncated() {
        let config = load(&[("JWT_SECRET", SECRET), ("AUTH_TIMEOUT_MS", "18446744073709551615")])
            .unwrap();

        assert_eq!(config.auth.operation_timeout, Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = load(&[("JWT_SECRET", SECRET), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = load(&[("JWT_SECRET", SECRET), ("HASH_ALGORITHM", "md5")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HASH_ALGORITHM", .. }));
    }

    #[test]
    fn test_cost_out_of_range_is_rejected() {
        let err = load(&[("JWT_SECRET", SECRET), ("HASH_COST", "40")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HASH_COST", .. }));
    }
}
