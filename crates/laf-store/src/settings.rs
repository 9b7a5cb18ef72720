//! Store settings
//!
//! Both stores are described by the same record: a database name, a
//! connection URI and a pool size. Values come from `LAF_`-prefixed
//! environment variables with `__` between nested keys:
//!
//! ```text
//! LAF_SYS_DB__DATABASE=sys
//! LAF_SYS_DB__URI=/var/lib/laf
//! LAF_SYS_DB__POOL_SIZE=10
//! LAF_APP_DB__URI=:memory:
//! LAF_LOG_PROFILE=production
//! ```

use config::{Config, Environment, Map};
use laf_core::errors::ResourceError;
use laf_core::logging_facility::Profile;
use laf_core_types::Sensitive;
use serde::Deserialize;

use crate::errors::{from_config, Result};

/// URI selecting a named, process-shared in-memory database
pub const MEMORY_URI: &str = ":memory:";

pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Connection settings for one backing store
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub database: String,
    pub uri: Sensitive<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

impl DbConfig {
    pub fn new(database: impl Into<String>, uri: impl Into<String>, pool_size: u32) -> Self {
        Self {
            database: database.into(),
            uri: Sensitive::new(uri.into()),
            pool_size,
        }
    }

    /// Settings for a shared in-memory database named `database`
    pub fn in_memory(database: impl Into<String>, pool_size: u32) -> Self {
        Self::new(database, MEMORY_URI, pool_size)
    }

    /// Reject settings no pool can be built from
    pub fn validate(&self, store: &str) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ResourceError::InvalidConfig {
                reason: format!("{}.database must not be empty", store),
            }
            .into());
        }
        check_database_name(&self.database)?;
        if self.uri.expose().trim().is_empty() {
            return Err(ResourceError::InvalidConfig {
                reason: format!("{}.uri must not be empty", store),
            }
            .into());
        }
        if self.pool_size == 0 {
            return Err(ResourceError::InvalidConfig {
                reason: format!("{}.pool_size must be at least 1", store),
            }
            .into());
        }
        Ok(())
    }
}

/// Reject database names that cannot be used verbatim as a file name and
/// inside a `file:` URI
///
/// Allowed: ASCII letters, digits, `_`, `-` and `.`.
pub fn check_database_name(database: &str) -> Result<()> {
    let valid = !database.is_empty()
        && database
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        return Ok(());
    }
    Err(ResourceError::InvalidConfig {
        reason: format!(
            "database name {:?} may only contain letters, digits, '_', '-' and '.'",
            database
        ),
    }
    .into())
}

/// Everything the registry needs to build the process-wide resources
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub sys_db: DbConfig,
    pub app_db: DbConfig,
    #[serde(default)]
    pub log_profile: Profile,
}

impl Settings {
    pub fn new(sys_db: DbConfig, app_db: DbConfig) -> Self {
        Self {
            sys_db,
            app_db,
            log_profile: Profile::default(),
        }
    }

    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        Self::from_source(environment())
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment
    pub fn from_env_map(vars: Map<String, String>) -> Result<Self> {
        Self::from_source(environment().source(Some(vars)))
    }

    fn from_source(env: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("sys_db.database", "sys")
            .and_then(|b| b.set_default("sys_db.uri", MEMORY_URI))
            .and_then(|b| b.set_default("sys_db.pool_size", i64::from(DEFAULT_POOL_SIZE)))
            .and_then(|b| b.set_default("app_db.database", "app"))
            .and_then(|b| b.set_default("app_db.uri", MEMORY_URI))
            .and_then(|b| b.set_default("app_db.pool_size", i64::from(DEFAULT_POOL_SIZE)))
            .map_err(from_config)?
            .add_source(env)
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(from_config)?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.sys_db.validate("sys_db")?;
        self.app_db.validate("app_db")
    }
}

fn environment() -> Environment {
    Environment::with_prefix("LAF")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laf_core::ExErrorKind;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_variables() {
        let settings = Settings::from_env_map(Map::new()).unwrap();
        assert_eq!(settings.sys_db.database, "sys");
        assert_eq!(settings.app_db.database, "app");
        assert_eq!(settings.sys_db.uri.expose(), MEMORY_URI);
        assert_eq!(settings.app_db.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(settings.log_profile, Profile::Development);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::from_env_map(vars(&[
            ("LAF_SYS_DB__DATABASE", "platform"),
            ("LAF_SYS_DB__URI", "/var/lib/laf"),
            ("LAF_SYS_DB__POOL_SIZE", "3"),
            ("LAF_APP_DB__POOL_SIZE", "25"),
            ("LAF_LOG_PROFILE", "production"),
        ]))
        .unwrap();

        assert_eq!(settings.sys_db.database, "platform");
        assert_eq!(settings.sys_db.uri.expose(), "/var/lib/laf");
        assert_eq!(settings.sys_db.pool_size, 3);
        assert_eq!(settings.app_db.database, "app");
        assert_eq!(settings.app_db.pool_size, 25);
        assert_eq!(settings.log_profile, Profile::Production);
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let err = Settings::from_env_map(vars(&[("LAF_APP_DB__POOL_SIZE", "0")])).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
        assert!(err.message().contains("app_db.pool_size"));
    }

    #[test]
    fn test_empty_database_rejected() {
        let config = DbConfig::new("  ", MEMORY_URI, 1);
        let err = config.validate("sys_db").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }

    #[test]
    fn test_database_name_with_uri_syntax_rejected() {
        for name in ["sys?mode=rw", "app#frag", "a&cache=private", "../escape", "two words"] {
            let err = DbConfig::in_memory(name, 1).validate("sys_db").unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidConfig, "{} was accepted", name);
        }
        assert!(DbConfig::in_memory("tenant-01.data_v2", 1)
            .validate("app_db")
            .is_ok());
    }

    #[test]
    fn test_debug_redacts_uri() {
        let config = DbConfig::new("sys", "file:/srv/sys.db?password=hunter2", 2);
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("sys"));
        assert!(!debug_str.contains("hunter2"));
    }
}
