// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{IdentityMatch, PackageId, Pilgrim, PilgrimId, PilgrimStatus};
use tracing::debug;

use crate::data_models::PilgrimRow;
use crate::diesel_schema::pilgrims;
use crate::error::PersistenceError;

/// Narrows a pilgrim listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PilgrimFilter {
    /// Only pilgrims in this status.
    pub status: Option<PilgrimStatus>,
    /// Only pilgrims assigned to this package.
    pub package_id: Option<PackageId>,
    /// Include soft-deleted pilgrims.
    pub include_deleted: bool,
}

/// Retrieves a pilgrim by id, soft-deleted or not.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_pilgrim(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
) -> Result<Option<Pilgrim>, PersistenceError> {
    pilgrims::table
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .select(PilgrimRow::as_select())
        .first(conn)
        .optional()?
        .map(Pilgrim::try_from)
        .transpose()
}

/// Finds non-deleted pilgrims holding either identity document.
///
/// Cancelled pilgrims are included; the caller decides what a cancelled
/// match means. Results are ordered by pilgrim id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `national_id` - National ID to look for
/// * `passport_number` - Passport number to look for
/// * `exclude` - A pilgrim to leave out of the results
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn find_identity_matches(
    conn: &mut SqliteConnection,
    national_id: Option<&str>,
    passport_number: Option<&str>,
    exclude: Option<PilgrimId>,
) -> Result<Vec<IdentityMatch>, PersistenceError> {
    let mut query = pilgrims::table
        .filter(pilgrims::is_deleted.eq(0))
        .select(PilgrimRow::as_select())
        .order(pilgrims::pilgrim_id.asc())
        .into_boxed();
    query = match (national_id, passport_number) {
        (Some(nid), Some(passport)) => query.filter(
            pilgrims::national_id
                .eq(nid)
                .or(pilgrims::passport_number.eq(passport)),
        ),
        (Some(nid), None) => query.filter(pilgrims::national_id.eq(nid)),
        (None, Some(passport)) => query.filter(pilgrims::passport_number.eq(passport)),
        (None, None) => return Ok(Vec::new()),
    };
    if let Some(excluded) = exclude {
        query = query.filter(pilgrims::pilgrim_id.ne(excluded.value()));
    }

    let rows: Vec<PilgrimRow> = query.load(conn)?;
    debug!(matches = rows.len(), "Identity lookup finished");
    rows.into_iter()
        .map(|row| {
            Pilgrim::try_from(row).map(|pilgrim| IdentityMatch {
                pilgrim_id: pilgrim.pilgrim_id,
                national_id: pilgrim.profile.national_id,
                passport_number: pilgrim.profile.passport_number,
                status: pilgrim.status,
            })
        })
        .collect()
}

/// Lists the non-deleted pilgrims assigned to a package, live or not.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn pilgrims_on_package(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<Vec<PilgrimId>, PersistenceError> {
    let ids: Vec<i64> = pilgrims::table
        .filter(pilgrims::package_id.eq(package_id.value()))
        .filter(pilgrims::is_deleted.eq(0))
        .select(pilgrims::pilgrim_id)
        .order(pilgrims::pilgrim_id.asc())
        .load(conn)?;
    Ok(ids.into_iter().map(PilgrimId::new).collect())
}

/// Counts pilgrims holding a seat: assigned, not deleted, not cancelled.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_attached_pilgrims(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<i64, PersistenceError> {
    Ok(pilgrims::table
        .filter(pilgrims::package_id.eq(package_id.value()))
        .filter(pilgrims::is_deleted.eq(0))
        .filter(pilgrims::status.ne(PilgrimStatus::Cancelled.as_str()))
        .count()
        .get_result(conn)?)
}

/// Counts non-deleted pilgrims assigned to a package, cancelled ones included.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_assigned_pilgrims(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<i64, PersistenceError> {
    Ok(pilgrims::table
        .filter(pilgrims::package_id.eq(package_id.value()))
        .filter(pilgrims::is_deleted.eq(0))
        .count()
        .get_result(conn)?)
}

/// Lists pilgrims matching a filter, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_pilgrims(
    conn: &mut SqliteConnection,
    filter: &PilgrimFilter,
) -> Result<Vec<Pilgrim>, PersistenceError> {
    let mut query = pilgrims::table
        .select(PilgrimRow::as_select())
        .order(pilgrims::pilgrim_id.asc())
        .into_boxed();
    if !filter.include_deleted {
        query = query.filter(pilgrims::is_deleted.eq(0));
    }
    if let Some(status) = filter.status {
        query = query.filter(pilgrims::status.eq(status.as_str()));
    }
    if let Some(package_id) = filter.package_id {
        query = query.filter(pilgrims::package_id.eq(package_id.value()));
    }

    let rows: Vec<PilgrimRow> = query.load(conn)?;
    rows.into_iter().map(Pilgrim::try_from).collect()
}
