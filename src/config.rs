use crate::*;
use confique::Config as _;
use std::{path::PathBuf, sync::OnceLock, time::Duration};

#[derive(confique::Config)]
pub struct Config {
    /// License tier assumed when a caller does not pass one explicitly.
    #[config(env = "ESQL_LICENSE")]
    pub license: Option<String>,
    #[config(env = "ESQL_CACHE_CAPACITY", default = 256)]
    pub cache_capacity: u64,
    #[config(env = "ESQL_CACHE_TTL_SECS", default = 30)]
    pub cache_ttl_secs: u64,
    /// JSON schema document used by the `esql-check` binary.
    #[config(env = "ESQL_SCHEMA")]
    pub schema: Option<PathBuf>,
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Parsed [`LicenseTier`] from `ESQL_LICENSE`; unknown values are ignored.
    pub fn license_tier(&self) -> Option<LicenseTier> {
        let raw = self.license.as_deref()?;
        match raw.parse() {
            Ok(tier) => Some(tier),
            Err(err) => {
                warn!("Ignoring ESQL_LICENSE: {err}");
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            license: None,
            cache_capacity: 256,
            cache_ttl_secs: 30,
            schema: None,
        }
    }
}

impl Config {
    /// Read the environment; malformed values are an [`Error::Config`].
    pub fn load() -> Result<Self> {
        Config::builder()
            .env()
            .load()
            .map_err(|err| Error::Config(err.to_string()))
    }

    /// [`Config::load`], falling back to defaults when the environment is
    /// malformed.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!("{err}; using default configuration");
            Self::default()
        })
    }
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(Config::load_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_environment_falls_back_to_defaults() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("ESQL_CACHE_TTL_SECS", "soon") };
        let loaded = Config::load();
        let fallback = Config::load_or_default();
        unsafe { std::env::remove_var("ESQL_CACHE_TTL_SECS") };

        assert!(matches!(loaded, Err(Error::Config(_))));
        assert_eq!(fallback.cache_ttl(), Config::default().cache_ttl());
        assert_eq!(fallback.cache_capacity, Config::default().cache_capacity);
    }

    #[test]
    fn defaults_load_without_environment() {
        let config = config();
        assert!(config.cache_capacity > 0);
        assert!(config.cache_ttl() >= Duration::from_secs(1));
    }
}
