use std::{env, fmt::Display, str::FromStr};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub version: String,
    pub project_url: Option<String>,
    pub seed_users: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(var)
    }

    /// Builds the config from any key lookup, `None` meaning unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            version: try_load(&lookup, "VERSION", "inconnu")?,
            project_url: lookup("PROJECT_URL").filter(|url| !url.is_empty()),
            seed_users: try_load(&lookup, "SEED_USERS", "true")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("Environment misconfigured: invalid {key} value: {e}")
        })
}
