//! Store handle
//!
//! `Db` is the query surface the rest of the service uses. It holds no
//! connection of its own: every call checks one out of the underlying
//! `Accessor` and returns it when the call finishes.

use rusqlite::{Connection, OptionalExtension, Params, Row, Transaction};
use std::sync::Arc;

use crate::accessor::Accessor;
use crate::errors::{from_rusqlite, Result};

/// Query-capable handle layered on a connection pool
#[derive(Debug, Clone)]
pub struct Db {
    accessor: Arc<Accessor>,
}

impl Db {
    /// Build a handle on a live accessor
    pub fn new(accessor: Arc<Accessor>) -> Self {
        Self { accessor }
    }

    pub fn database(&self) -> &str {
        self.accessor.database()
    }

    pub fn accessor(&self) -> &Arc<Accessor> {
        &self.accessor
    }

    /// Run `f` against a pooled connection
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.accessor.get()?;
        f(&conn).map_err(|e| from_rusqlite(e).with_entity_id(self.database()))
    }

    /// Run `f` inside a transaction that commits when `f` succeeds
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = self.accessor.get()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let value = f(&tx).map_err(|e| from_rusqlite(e).with_entity_id(self.database()))?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }

    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.with_conn(|conn| conn.execute(sql, params))
    }

    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.with_conn(|conn| conn.execute_batch(sql))
    }

    pub fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_conn(|conn| conn.query_row(sql, params, map))
    }

    /// `query_row` that yields `None` instead of failing on an empty result
    pub fn query_optional<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_conn(|conn| conn.query_row(sql, params, map).optional())
    }

    /// Round-trip a trivial statement through the pool
    pub fn ping(&self) -> Result<()> {
        self.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
    }
}
