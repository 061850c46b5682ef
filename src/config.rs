use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::{
    error::ConfigError,
    recommendlet::{DEFAULT_PORT, MAX_RECOMMEND},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub reg_name: String,
    pub max_recommend: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] but reads values through `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: try_load(&lookup, "RECOMMENDLET_HOST", "localhost")?,
            port: try_load(&lookup, "RECOMMENDLET_PORT", &DEFAULT_PORT.to_string())?,
            reg_name: try_load(&lookup, "RECOMMENDLET_REG_NAME", "recommendlet")?,
            max_recommend: try_load(
                &lookup,
                "RECOMMENDLET_MAX_RECOMMEND",
                &MAX_RECOMMEND.to_string(),
            )?,
        })
    }
}

fn try_load<T, L>(lookup: &L, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    L: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            value,
            reason: e.to_string(),
        }
    })
}
