// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{ActivityLogEntry, ActivityLogRow};
use crate::diesel_schema::activity_logs;
use crate::error::PersistenceError;

/// Narrows an activity log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub actor_id: Option<String>,
    /// Maximum number of entries; unbounded when `None`.
    pub limit: Option<i64>,
}

/// Lists activity log entries, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_activity(
    conn: &mut SqliteConnection,
    filter: &ActivityFilter,
) -> Result<Vec<ActivityLogEntry>, PersistenceError> {
    let mut query = activity_logs::table
        .select(ActivityLogRow::as_select())
        .order(activity_logs::log_id.desc())
        .into_boxed();
    if let Some(entity_type) = &filter.entity_type {
        query = query.filter(activity_logs::entity_type.eq(entity_type.clone()));
    }
    if let Some(entity_id) = filter.entity_id {
        query = query.filter(activity_logs::entity_id.eq(entity_id));
    }
    if let Some(actor_id) = &filter.actor_id {
        query = query.filter(activity_logs::actor_id.eq(actor_id.clone()));
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }

    let rows: Vec<ActivityLogRow> = query.load(conn)?;
    Ok(rows.into_iter().map(ActivityLogEntry::from).collect())
}
