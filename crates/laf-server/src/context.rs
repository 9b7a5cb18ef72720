//! Request-handler context
//!
//! Handlers receive an `AppContext` instead of reaching for global state.
//! It is only constructed from a registry that reached `Ready`.

use laf_core::errors::ResourceError;
use laf_core::Logger;
use laf_store::registry::{APP_DB_SLOT, LOGGER_SLOT, SYS_DB_SLOT};
use laf_store::{Db, ResourceRegistry, Result, Settings};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppContext {
    registry: Arc<ResourceRegistry>,
    logger: Logger,
    sys_db: Db,
    app_db: Db,
}

impl AppContext {
    /// Build and initialize the registry, then freeze it into a context
    pub fn bootstrap(settings: Settings) -> Result<Self> {
        let mut registry = ResourceRegistry::new(settings);
        registry.init()?;
        Self::from_registry(registry.into_shared()?)
    }

    pub fn from_registry(registry: Arc<ResourceRegistry>) -> Result<Self> {
        let logger = registry
            .logger()
            .cloned()
            .ok_or(ResourceError::AccessorEmpty { slot: LOGGER_SLOT })?;
        let sys_db = registry.sys_db().cloned().ok_or(ResourceError::AccessorEmpty {
            slot: SYS_DB_SLOT,
        })?;
        let app_db = registry.app_db().cloned().ok_or(ResourceError::AccessorEmpty {
            slot: APP_DB_SLOT,
        })?;

        Ok(Self {
            registry,
            logger,
            sys_db,
            app_db,
        })
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Platform metadata store
    pub fn sys_db(&self) -> &Db {
        &self.sys_db
    }

    /// Tenant business data store
    pub fn app_db(&self) -> &Db {
        &self.app_db
    }
}
