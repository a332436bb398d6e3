use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub struct Config {
    pub port: u16,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: Option<String>,
    pub db_name: String,
    pub db_max_connections: u32,
    pub poll_interval: Duration,
    pub static_dir: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval_ms: u64 = try_load(&lookup, "POLL_INTERVAL_MS", "2000")?;
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        let db_max_connections: u32 = try_load(&lookup, "DB_MAX_CONNECTIONS", "5")?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", "8085")?,
            db_host: required(&lookup, "POSTGRES_HOST")?,
            db_port: try_load(&lookup, "POSTGRES_PORT", "5432")?,
            db_user: required(&lookup, "POSTGRES_USER")?,
            db_password: lookup("POSTGRES_PASSWORD"),
            db_name: required(&lookup, "POSTGRES_DB")?,
            db_max_connections,
            poll_interval: Duration::from_millis(poll_interval_ms),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| {
        warn!("Environment variable {key} not found");
        ConfigError::Missing(key)
    })
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid { key, value: raw }
    })
}
