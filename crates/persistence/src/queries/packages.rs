// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{Package, PackageId};

use crate::data_models::PackageRow;
use crate::diesel_schema::packages;
use crate::error::PersistenceError;

/// Retrieves a package by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_package(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<Option<Package>, PersistenceError> {
    packages::table
        .filter(packages::package_id.eq(package_id.value()))
        .select(PackageRow::as_select())
        .first(conn)
        .optional()?
        .map(Package::try_from)
        .transpose()
}

/// Returns the id of the package using `code`, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_package_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<PackageId>, PersistenceError> {
    Ok(packages::table
        .filter(packages::code.eq(code))
        .select(packages::package_id)
        .first::<i64>(conn)
        .optional()?
        .map(PackageId::new))
}

/// Lists every package ordered by departure date, then id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_packages(conn: &mut SqliteConnection) -> Result<Vec<Package>, PersistenceError> {
    let rows: Vec<PackageRow> = packages::table
        .select(PackageRow::as_select())
        .order((packages::departure_date.asc(), packages::package_id.asc()))
        .load(conn)?;
    rows.into_iter().map(Package::try_from).collect()
}
