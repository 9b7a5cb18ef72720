//! SQLite connection pool
//!
//! An `Accessor` owns a fixed number of connections to one database. `init`
//! opens all of them and performs the handshake; afterwards callers check
//! connections out with `get` and hand them back by dropping the guard.

use laf_core::logging_facility::{create_logger, Logger};
use laf_core_types::Sensitive;
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::errors::{
    checkout_timeout, connection_failed, empty_pool, pool_not_initialized, pool_poisoned, Result,
};
use crate::settings::{check_database_name, DbConfig, MEMORY_URI};

/// Pool sizing and transport options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorOptions {
    pub pool_size: u32,
    /// How long a statement waits on a locked database file
    pub busy_timeout: Duration,
    /// How long `get` waits for an idle connection
    pub checkout_timeout: Duration,
}

impl Default for AccessorOptions {
    fn default() -> Self {
        Self {
            pool_size: crate::settings::DEFAULT_POOL_SIZE,
            busy_timeout: Duration::from_secs(5),
            checkout_timeout: Duration::from_secs(30),
        }
    }
}

impl AccessorOptions {
    pub fn with_pool_size(pool_size: u32) -> Self {
        Self {
            pool_size,
            ..Self::default()
        }
    }
}

/// Connection pool for one database
pub struct Accessor {
    database: String,
    uri: Sensitive<String>,
    options: AccessorOptions,
    logger: Logger,
    idle: Mutex<Vec<Connection>>,
    returned: Condvar,
    opened: AtomicUsize,
    initialized: AtomicBool,
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("database", &self.database)
            .field("uri", &self.uri)
            .field("pool_size", &self.options.pool_size)
            .field("opened", &self.opened_connections())
            .finish()
    }
}

impl Accessor {
    /// Describe a pool; nothing is opened until `init`
    pub fn new(
        database: impl Into<String>,
        uri: impl Into<Sensitive<String>>,
        options: AccessorOptions,
    ) -> Self {
        Self {
            database: database.into(),
            uri: uri.into(),
            options,
            logger: create_logger("db", None),
            idle: Mutex::new(Vec::new()),
            returned: Condvar::new(),
            opened: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &DbConfig, options: AccessorOptions) -> Self {
        Self::new(
            config.database.clone(),
            config.uri.clone(),
            AccessorOptions {
                pool_size: config.pool_size,
                ..options
            },
        )
    }

    /// Replace the logger used for pool events
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// Open every connection in the pool and run the handshake
    ///
    /// Calling `init` on a live pool does nothing. On failure the
    /// connections opened so far are closed and the pool stays uninitialized.
    /// A zero-sized pool or a database name unusable in a file name or URI
    /// is rejected before anything is opened.
    pub fn init(&self) -> Result<()> {
        let mut idle = self.lock_idle()?;
        if self.is_initialized() {
            return Ok(());
        }
        if self.options.pool_size == 0 {
            return Err(empty_pool(&self.database));
        }
        check_database_name(&self.database)?;

        self.logger.info(&format!(
            "opening {} connections to {}",
            self.options.pool_size, self.database
        ));

        let mut opened = Vec::with_capacity(self.options.pool_size as usize);
        for _ in 0..self.options.pool_size {
            match self.connect() {
                Ok(conn) => opened.push(conn),
                Err(err) => {
                    self.logger.error(&format!(
                        "connection to {} failed: {}",
                        self.database,
                        err.message()
                    ));
                    return Err(err);
                }
            }
        }

        self.opened.fetch_add(opened.len(), Ordering::SeqCst);
        idle.extend(opened);
        self.initialized.store(true, Ordering::SeqCst);

        self.logger
            .info(&format!("connection pool for {} is ready", self.database));
        Ok(())
    }

    /// Check a connection out of the pool
    ///
    /// Blocks up to `checkout_timeout` when every connection is in use.
    pub fn get(&self) -> Result<PooledConnection<'_>> {
        if !self.is_initialized() {
            return Err(pool_not_initialized(&self.database));
        }

        let started = Instant::now();
        let mut idle = self.lock_idle()?;
        loop {
            if let Some(conn) = idle.pop() {
                return Ok(PooledConnection {
                    accessor: self,
                    conn: Some(conn),
                });
            }

            let waited = started.elapsed();
            if waited >= self.options.checkout_timeout {
                self.logger.warn(&format!(
                    "connection pool for {} exhausted ({} in use)",
                    self.database, self.options.pool_size
                ));
                return Err(checkout_timeout(&self.database, waited));
            }

            let (guard, _) = self
                .returned
                .wait_timeout(idle, self.options.checkout_timeout - waited)
                .map_err(|_| pool_poisoned(&self.database))?;
            idle = guard;
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn options(&self) -> &AccessorOptions {
        &self.options
    }

    pub fn pool_size(&self) -> u32 {
        self.options.pool_size
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Connections opened over the pool's lifetime
    pub fn opened_connections(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections currently waiting in the pool
    pub fn idle_connections(&self) -> Result<usize> {
        Ok(self.lock_idle()?.len())
    }

    /// Where SQLite should open this database
    fn location(&self) -> String {
        let uri = self.uri.expose();
        if uri == MEMORY_URI {
            format!("file:{}?mode=memory&cache=shared", self.database)
        } else if uri.starts_with("file:") {
            uri.clone()
        } else {
            Path::new(uri)
                .join(format!("{}.db", self.database))
                .to_string_lossy()
                .into_owned()
        }
    }

    fn connect(&self) -> Result<Connection> {
        let conn =
            Connection::open(self.location()).map_err(|e| connection_failed(&self.database, e))?;
        conn.busy_timeout(self.options.busy_timeout)
            .map_err(|e| connection_failed(&self.database, e))?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| connection_failed(&self.database, e))?;
        // Opening is lazy in SQLite; the first statement is the real handshake
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| connection_failed(&self.database, e))?;
        Ok(conn)
    }

    fn lock_idle(&self) -> Result<MutexGuard<'_, Vec<Connection>>> {
        self.idle.lock().map_err(|_| pool_poisoned(&self.database))
    }

    fn release(&self, conn: Connection) {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(conn);
            self.returned.notify_one();
        }
    }
}

/// A connection checked out of an `Accessor`, returned on drop
pub struct PooledConnection<'a> {
    accessor: &'a Accessor,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only `drop` takes the connection out
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.accessor.release(conn);
        }
    }
}
