// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the pilgrim registration engine.
//!
//! This crate stores pilgrims, packages, registrations, payments and the
//! activity log in `SQLite` through Diesel. It implements the engine's
//! `Store` seam so every `Registrar` operation runs inside one
//! `BEGIN IMMEDIATE` transaction, and offers read-only queries for the
//! request layer.
//!
//! ## Schema
//!
//! Migrations are embedded and applied when a connection is opened.
//! Besides plain columns the schema carries constraints the engine relies
//! on as a second line of defence:
//!
//! - partial unique indexes on national ID and passport number among live
//!   pilgrims
//! - a partial unique index on active `(pilgrim, package)` registrations
//! - `CHECK (occupied_seats <= total_capacity)` on packages
//!
//! ## Testing
//!
//! Tests run against a fresh shared in-memory database per call to
//! [`Persistence::new_in_memory`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use jamaah_audit::AuditEvent;
use jamaah_domain::{Package, PackageId, Payment, PaymentId, Pilgrim, PilgrimId, Registration};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::ActivityLogEntry;
pub use error::PersistenceError;
pub use queries::activity::ActivityFilter;
pub use queries::pilgrims::PilgrimFilter;
pub use store::SqliteTransaction;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` persistence adapter.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Shared cache so every handle to this name sees one database.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the check fails or enforcement is off.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Activity log
    // ========================================================================

    /// Persists an audit event into the activity log.
    ///
    /// # Returns
    ///
    /// The log id assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::activity::insert_activity_log(&mut self.conn, event)
    }

    /// Lists activity log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_activity(
        &mut self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityLogEntry>, PersistenceError> {
        queries::activity::list_activity(&mut self.conn, filter)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Retrieves a pilgrim, soft-deleted or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pilgrim(&mut self, pilgrim_id: PilgrimId) -> Result<Option<Pilgrim>, PersistenceError> {
        queries::pilgrims::find_pilgrim(&mut self.conn, pilgrim_id)
    }

    /// Lists pilgrims matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pilgrims(&mut self, filter: &PilgrimFilter) -> Result<Vec<Pilgrim>, PersistenceError> {
        queries::pilgrims::list_pilgrims(&mut self.conn, filter)
    }

    /// Retrieves a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_package(&mut self, package_id: PackageId) -> Result<Option<Package>, PersistenceError> {
        queries::packages::find_package(&mut self.conn, package_id)
    }

    /// Lists every package.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_packages(&mut self) -> Result<Vec<Package>, PersistenceError> {
        queries::packages::list_packages(&mut self.conn)
    }

    /// Lists a pilgrim's registrations, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_registrations(
        &mut self,
        pilgrim_id: PilgrimId,
    ) -> Result<Vec<Registration>, PersistenceError> {
        queries::registrations::list_registrations(&mut self.conn, pilgrim_id)
    }

    /// Retrieves a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_payment(&mut self, payment_id: PaymentId) -> Result<Option<Payment>, PersistenceError> {
        queries::payments::find_payment(&mut self.conn, payment_id)
    }

    /// Lists a pilgrim's payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_payments(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_payments(&mut self.conn, pilgrim_id)
    }
}
