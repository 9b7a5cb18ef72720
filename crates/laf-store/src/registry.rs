//! Process-wide resource registry
//!
//! Holds the shared logger plus the system store (platform metadata such as
//! function definitions and access policies) and the application store
//! (tenant business data), each as an accessor and the `Db` built on it.
//!
//! The registry is an ordinary value built at the composition root and
//! shared through `Arc` once `init` has run. `init` fills the slots in order:
//!
//! 1. logger
//! 2. system accessor, then system `Db`
//! 3. application accessor, then application `Db`
//!
//! and then moves the registry from `Uninitialized` to `Ready`. A `Ready`
//! registry rejects every mutation.

use laf_core::errors::{ExError, ExErrorKind, ResourceError};
use laf_core::logging_facility::{create_logger, Logger};
use laf_core::{log_op_end, log_op_error, log_op_start};
use laf_core_types::schema::{COMPONENT_DB, COMPONENT_SERVER};
use std::sync::Arc;
use std::time::Instant;
use tracing::Level;

use crate::accessor::{Accessor, AccessorOptions};
use crate::db::Db;
use crate::errors::Result;
use crate::settings::{DbConfig, Settings};

pub const LOGGER_SLOT: &str = "logger";
pub const SYS_ACCESSOR_SLOT: &str = "sys_accessor";
pub const SYS_DB_SLOT: &str = "sys_db";
pub const APP_ACCESSOR_SLOT: &str = "app_accessor";
pub const APP_DB_SLOT: &str = "app_db";

/// Component name of the registry-wide logger
pub const SERVER_COMPONENT: &str = COMPONENT_SERVER;
/// Component name of the logger attached to each accessor
pub const DB_COMPONENT: &str = COMPONENT_DB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Slots may still be filled
    Uninitialized,
    /// Every slot is populated; no further mutation is accepted
    Ready,
}

/// A value for one registry slot
#[derive(Debug, Clone)]
pub enum Resource {
    Logger(Logger),
    SysAccessor(Arc<Accessor>),
    SysDb(Db),
    AppAccessor(Arc<Accessor>),
    AppDb(Db),
}

impl Resource {
    pub fn slot(&self) -> &'static str {
        match self {
            Resource::Logger(_) => LOGGER_SLOT,
            Resource::SysAccessor(_) => SYS_ACCESSOR_SLOT,
            Resource::SysDb(_) => SYS_DB_SLOT,
            Resource::AppAccessor(_) => APP_ACCESSOR_SLOT,
            Resource::AppDb(_) => APP_DB_SLOT,
        }
    }
}

/// Owner of the process-wide storage connections and logger
#[derive(Debug)]
pub struct ResourceRegistry {
    settings: Settings,
    state: RegistryState,
    logger: Option<Logger>,
    sys_accessor: Option<Arc<Accessor>>,
    sys_db: Option<Db>,
    app_accessor: Option<Arc<Accessor>>,
    app_db: Option<Db>,
}

impl ResourceRegistry {
    /// Create an empty registry; nothing is opened until `init`
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: RegistryState::Uninitialized,
            logger: None,
            sys_accessor: None,
            sys_db: None,
            app_accessor: None,
            app_db: None,
        }
    }

    /// Build every missing resource in order, then freeze
    ///
    /// Slots that already hold a value are left alone, so repeated calls
    /// open no new connections. If a step fails the slots filled before it
    /// stay populated, the registry stays `Uninitialized`, and the error is
    /// returned as is.
    pub fn init(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let started = Instant::now();
        log_op_start!("registry_init");

        match self.populate() {
            Ok(()) => {
                self.state = RegistryState::Ready;
                log_op_end!(
                    "registry_init",
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "registry_init",
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    fn populate(&mut self) -> Result<()> {
        if self.logger.is_none() {
            self.logger = Some(create_logger(SERVER_COMPONENT, None));
        }

        if self.sys_accessor.is_none() {
            self.sys_accessor = Some(create_accessor(&self.settings.sys_db, SYS_ACCESSOR_SLOT)?);
        }
        if self.sys_db.is_none() {
            self.sys_db = Some(self.create_sys_db()?);
        }

        if self.app_accessor.is_none() {
            self.app_accessor = Some(create_accessor(&self.settings.app_db, APP_ACCESSOR_SLOT)?);
        }
        if self.app_db.is_none() {
            self.app_db = Some(self.create_app_db()?);
        }

        Ok(())
    }

    /// Build a new system `Db` on the system accessor
    pub fn create_sys_db(&self) -> Result<Db> {
        self.sys_accessor
            .as_ref()
            .map(|accessor| Db::new(Arc::clone(accessor)))
            .ok_or_else(|| {
                ResourceError::AccessorEmpty {
                    slot: SYS_ACCESSOR_SLOT,
                }
                .into()
            })
    }

    /// Build a new application `Db` on the application accessor
    pub fn create_app_db(&self) -> Result<Db> {
        self.app_accessor
            .as_ref()
            .map(|accessor| Db::new(Arc::clone(accessor)))
            .ok_or_else(|| {
                ResourceError::AccessorEmpty {
                    slot: APP_ACCESSOR_SLOT,
                }
                .into()
            })
    }

    /// Fill one empty slot from outside `init`
    ///
    /// Fails with `Frozen` once the registry is `Ready`, with `AlreadyExists`
    /// for a populated slot, and with `Precondition` for an accessor that
    /// has not run its own `init` or a `Db` whose accessor slot is still
    /// empty.
    pub fn install(&mut self, resource: Resource) -> Result<()> {
        let slot = resource.slot();
        if self.is_ready() {
            return Err(ResourceError::Frozen { slot }.into());
        }

        match resource {
            Resource::Logger(logger) => fill(&mut self.logger, logger, slot),
            Resource::SysAccessor(accessor) => {
                check_accessor_live(&accessor, slot)?;
                fill(&mut self.sys_accessor, accessor, slot)
            }
            Resource::SysDb(db) => {
                check_db_accessor(&db, self.sys_accessor.as_ref(), SYS_ACCESSOR_SLOT)?;
                fill(&mut self.sys_db, db, slot)
            }
            Resource::AppAccessor(accessor) => {
                check_accessor_live(&accessor, slot)?;
                fill(&mut self.app_accessor, accessor, slot)
            }
            Resource::AppDb(db) => {
                check_db_accessor(&db, self.app_accessor.as_ref(), APP_ACCESSOR_SLOT)?;
                fill(&mut self.app_db, db, slot)
            }
        }
    }

    /// Share a `Ready` registry with request handlers
    pub fn into_shared(self) -> Result<Arc<Self>> {
        if !self.is_ready() {
            return Err(ExError::new(ExErrorKind::Precondition)
                .with_op("into_shared")
                .with_message("registry is not initialized, run init() first"));
        }
        Ok(Arc::new(self))
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == RegistryState::Ready
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    pub fn sys_accessor(&self) -> Option<&Arc<Accessor>> {
        self.sys_accessor.as_ref()
    }

    pub fn sys_db(&self) -> Option<&Db> {
        self.sys_db.as_ref()
    }

    pub fn app_accessor(&self) -> Option<&Arc<Accessor>> {
        self.app_accessor.as_ref()
    }

    pub fn app_db(&self) -> Option<&Db> {
        self.app_db.as_ref()
    }
}

/// Open and handshake a pool for one store
fn create_accessor(config: &DbConfig, slot: &'static str) -> Result<Arc<Accessor>> {
    config.validate(slot)?;

    let started = Instant::now();
    log_op_start!(
        component = DB_COMPONENT,
        "create_accessor",
        slot = slot,
        database = config.database.as_str(),
        pool_size = config.pool_size
    );

    let mut accessor = Accessor::from_config(config, AccessorOptions::default());
    accessor.set_logger(create_logger(DB_COMPONENT, Some(Level::WARN)));

    match accessor.init() {
        Ok(()) => {
            log_op_end!(
                component = DB_COMPONENT,
                "create_accessor",
                duration_ms = started.elapsed().as_millis() as u64,
                slot = slot
            );
            Ok(Arc::new(accessor))
        }
        Err(err) => {
            log_op_error!(
                component = DB_COMPONENT,
                "create_accessor",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64,
                slot = slot
            );
            Err(err)
        }
    }
}

fn fill<T>(target: &mut Option<T>, value: T, slot: &'static str) -> Result<()> {
    if target.is_some() {
        return Err(ResourceError::SlotOccupied { slot }.into());
    }
    *target = Some(value);
    Ok(())
}

/// An installed pool must already hold live connections; `init` never
/// revisits a filled slot
fn check_accessor_live(accessor: &Accessor, slot: &'static str) -> Result<()> {
    if accessor.is_initialized() {
        return Ok(());
    }
    Err(ExError::new(ExErrorKind::Precondition)
        .with_op("install")
        .with_entity_id(slot)
        .with_message(format!(
            "accessor for {} is not initialized, run its init() first",
            accessor.database()
        )))
}

fn check_db_accessor(
    db: &Db,
    accessor: Option<&Arc<Accessor>>,
    accessor_slot: &'static str,
) -> Result<()> {
    match accessor {
        None => Err(ResourceError::AccessorEmpty {
            slot: accessor_slot,
        }
        .into()),
        Some(accessor) if !Arc::ptr_eq(db.accessor(), accessor) => {
            Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("install")
                .with_entity_id(accessor_slot)
                .with_message(format!("store handle is not built on {}", accessor_slot)))
        }
        Some(_) => Ok(()),
    }
}
