//! Environment configuration

use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use practice_core::get_algorithm;
use tracing::{info, warn};

/// Scheduler used when SCHEDULING_ALGORITHM is not set
pub const DEFAULT_ALGORITHM: &str = "doubling";

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(value: &str) -> Self {
        if value.trim() == "*" {
            return Self::Any;
        }
        let origins: Vec<String> = value
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// Server configuration loaded at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    pub seed_starter_catalog: bool,
    pub scheduling_algorithm: String,
}

impl Config {
    /// Load from the process environment (after `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            database_max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "10")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: try_load(&lookup, "PORT", "8000")?,
            cors_origins: CorsOrigins::parse(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string())),
            seed_starter_catalog: try_load(&lookup, "SEED_STARTER_CATALOG", "true")?,
            scheduling_algorithm: load_algorithm(&lookup)?,
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load_algorithm<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let name = lookup("SCHEDULING_ALGORITHM")
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());

    if get_algorithm(&name).is_none() {
        warn!("Unknown SCHEDULING_ALGORITHM: {name}");
        return Err(anyhow!("unknown scheduling algorithm '{name}'"));
    }
    Ok(name)
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("invalid {key} value '{raw}': {e}")
        })
        .with_context(|| format!("loading {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/test")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.cors_origins, CorsOrigins::Any);
        assert!(config.seed_starter_catalog);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.scheduling_algorithm, "doubling");
    }

    #[test]
    fn test_database_url_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/test"),
            ("PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_list() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/test"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_seed_flag() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/test"),
            ("SEED_STARTER_CATALOG", "false"),
        ]))
        .unwrap();
        assert!(!config.seed_starter_catalog);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/test"),
            ("SCHEDULING_ALGORITHM", "fsrs"),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/test"),
            ("SCHEDULING_ALGORITHM", " Doubling "),
        ]))
        .unwrap();
        assert_eq!(config.scheduling_algorithm, "doubling");
    }
}
