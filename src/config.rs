// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MARKET_PAGE_SIZE: i64 = 20;
const DEFAULT_STORE_PAGE_SIZE: i64 = 10;
const DEFAULT_MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_MATERIAL_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Brak wymaganej zmiennej środowiskowej: {0}")]
    Missing(&'static str),

    #[error("Nieprawidłowa wartość zmiennej {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Domyślne rozmiary stron. Każde miejsce wywołania wybiera swój własny.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSizeDefaults {
    pub market: i64,
    pub store: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub page_sizes: PageSizeDefaults,
    pub material_cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let page_sizes = PageSizeDefaults {
            market: parse_positive(&lookup, "MARKET_PAGE_SIZE", DEFAULT_MARKET_PAGE_SIZE)?,
            store: parse_positive(&lookup, "STORE_PAGE_SIZE", DEFAULT_STORE_PAGE_SIZE)?,
            max: parse_positive(&lookup, "MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?,
        };

        Ok(AppConfig {
            database_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            page_sizes,
            material_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "MATERIAL_CACHE_TTL_SECS",
                DEFAULT_MATERIAL_CACHE_TTL_SECS,
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid { key, value })
        }
        None => Ok(default),
    }
}

fn parse_positive<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value <= 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/db")]))
                .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(
            config.page_sizes,
            PageSizeDefaults {
                market: 20,
                store: 10,
                max: 100
            }
        );
        assert_eq!(config.material_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "8080"),
            ("STORE_PAGE_SIZE", " 15 "),
            ("MAX_PAGE_SIZE", "40"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.page_sizes.store, 15);
        assert_eq!(config.page_sizes.max, 40);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "abc"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));

        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("MARKET_PAGE_SIZE", "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "MARKET_PAGE_SIZE",
                ..
            })
        ));
    }
}
