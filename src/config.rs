use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_IPMA_BASE_URL: &str = "https://api.ipma.pt/open-data";
/// Validity window for cached locations and weather types (1 hour).
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),

    #[error("CACHE_TTL_SECS must be a positive integer, got '{0}'")]
    InvalidCacheTtl(String),
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Default tracing level, overridden by `RUST_LOG` when set.
    pub log_level: String,
    /// Environment name ("development", "production", ...).
    pub environment: String,
    pub ipma_base_url: String,
    pub ipma_user_agent: String,
    pub cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let cache_ttl_secs = match lookup("CACHE_TTL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidCacheTtl(raw)),
            },
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            port,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            environment: lookup("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            ipma_base_url: lookup("IPMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IPMA_BASE_URL.to_string()),
            ipma_user_agent: lookup("IPMA_USER_AGENT")
                .unwrap_or_else(|| format!("ipma-api/{}", env!("CARGO_PKG_VERSION"))),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.environment, "development");
        assert_eq!(config.ipma_base_url, "https://api.ipma.pt/open-data");
        assert!(config.ipma_user_agent.starts_with("ipma-api/"));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("LOG_LEVEL", "debug"),
            ("APP_ENV", "Production"),
            ("IPMA_BASE_URL", "http://localhost:9999"),
            ("CACHE_TTL_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "debug");
        assert!(config.is_production());
        assert_eq!(config.ipma_base_url, "http://localhost:9999");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref v) if v == "http"));
    }

    #[test]
    fn test_invalid_cache_ttl() {
        assert!(matches!(
            config_from(&[("CACHE_TTL_SECS", "0")]),
            Err(ConfigError::InvalidCacheTtl(_))
        ));
        assert!(matches!(
            config_from(&[("CACHE_TTL_SECS", "-5")]),
            Err(ConfigError::InvalidCacheTtl(_))
        ));
    }
}
