// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activity log persistence.
//!
//! Entries are written after the engine transaction they describe has
//! committed, so a failure here never rolls back business data.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::activity_logs;
use crate::error::PersistenceError;

/// Persists an audit event as an activity log entry.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The log id assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_activity_log(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(activity_logs::table)
        .values((
            activity_logs::actor_id.eq(&event.actor.id),
            activity_logs::actor_type.eq(&event.actor.actor_type),
            activity_logs::entity_type.eq(event.entity_type.as_str()),
            activity_logs::entity_id.eq(event.entity_id),
            activity_logs::action.eq(&event.action.name),
            activity_logs::details.eq(event.action.details.as_deref()),
        ))
        .execute(conn)?;

    let log_id: i64 = get_last_insert_rowid(conn)?;
    debug!(log_id, action = %event.action.name, "Persisted activity log entry");
    Ok(log_id)
}
