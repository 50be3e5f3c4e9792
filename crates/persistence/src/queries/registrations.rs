// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{
    BookedTrip, DateRange, Package, PackageId, PilgrimId, Registration, RegistrationId,
    RegistrationStatus,
};

use crate::data_models::{PackageRow, RegistrationRow};
use crate::diesel_schema::{package_registrations, packages};
use crate::error::PersistenceError;

const ACTIVE: &str = RegistrationStatus::Active.as_str();

/// Loads a pilgrim's active registrations with their packages' dates,
/// oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn active_bookings(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
) -> Result<Vec<BookedTrip>, PersistenceError> {
    let rows: Vec<(i64, PackageRow)> = package_registrations::table
        .inner_join(packages::table)
        .filter(package_registrations::pilgrim_id.eq(pilgrim_id.value()))
        .filter(package_registrations::status.eq(ACTIVE))
        .order((
            package_registrations::created_at.asc(),
            package_registrations::registration_id.asc(),
        ))
        .select((
            package_registrations::registration_id,
            PackageRow::as_select(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(registration_id, package_row)| {
            let package: Package = Package::try_from(package_row)?;
            let travel_dates: DateRange = package.travel_dates;
            Ok(BookedTrip {
                registration_id: RegistrationId::new(registration_id),
                package_id: package.package_id,
                travel_dates,
            })
        })
        .collect()
}

/// Returns the active registration of a pilgrim on a package, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_registration(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    package_id: PackageId,
) -> Result<Option<RegistrationId>, PersistenceError> {
    Ok(package_registrations::table
        .filter(package_registrations::pilgrim_id.eq(pilgrim_id.value()))
        .filter(package_registrations::package_id.eq(package_id.value()))
        .filter(package_registrations::status.eq(ACTIVE))
        .select(package_registrations::registration_id)
        .first::<i64>(conn)
        .optional()?
        .map(RegistrationId::new))
}

/// Counts active registrations on a package.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_registrations(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<i64, PersistenceError> {
    Ok(package_registrations::table
        .filter(package_registrations::package_id.eq(package_id.value()))
        .filter(package_registrations::status.eq(ACTIVE))
        .count()
        .get_result(conn)?)
}

/// Counts every registration on a package, whatever its status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_registrations(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<i64, PersistenceError> {
    Ok(package_registrations::table
        .filter(package_registrations::package_id.eq(package_id.value()))
        .count()
        .get_result(conn)?)
}

/// Lists every registration of a pilgrim, cancelled ones included.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_registrations(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
) -> Result<Vec<Registration>, PersistenceError> {
    let rows: Vec<RegistrationRow> = package_registrations::table
        .filter(package_registrations::pilgrim_id.eq(pilgrim_id.value()))
        .select(RegistrationRow::as_select())
        .order(package_registrations::registration_id.asc())
        .load(conn)?;
    rows.into_iter().map(Registration::try_from).collect()
}
