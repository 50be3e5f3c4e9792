// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_core::SeatCount;
use jamaah_domain::{PackageDetails, PackageId, format_date};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::packages;
use crate::error::PersistenceError;

fn to_column(value: u32) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::QueryFailed(format!("seat count {value} does not fit the column"))
    })
}

/// Inserts a package with no seats occupied.
///
/// # Errors
///
/// Returns `UniqueViolation` if the code is taken, or another error if the
/// insert fails.
pub fn insert_package(
    conn: &mut SqliteConnection,
    details: &PackageDetails,
    created_at: &str,
) -> Result<PackageId, PersistenceError> {
    diesel::insert_into(packages::table)
        .values((
            packages::code.eq(&details.code),
            packages::name.eq(&details.name),
            packages::price.eq(details.price.minor()),
            packages::total_capacity.eq(to_column(details.total_capacity)?),
            packages::occupied_seats.eq(0),
            packages::departure_date.eq(format_date(details.travel_dates.start())),
            packages::return_date.eq(format_date(details.travel_dates.end())),
            packages::created_at.eq(created_at),
            packages::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let package_id: i64 = get_last_insert_rowid(conn)?;
    debug!(package_id, code = %details.code, "Inserted package");
    Ok(PackageId::new(package_id))
}

/// Overwrites a package's details without touching its seat counter.
///
/// # Errors
///
/// Returns an error if the update fails, including when the new capacity
/// falls below the occupied seats.
pub fn update_package(
    conn: &mut SqliteConnection,
    package_id: PackageId,
    details: &PackageDetails,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(packages::table)
        .filter(packages::package_id.eq(package_id.value()))
        .set((
            packages::code.eq(&details.code),
            packages::name.eq(&details.name),
            packages::price.eq(details.price.minor()),
            packages::total_capacity.eq(to_column(details.total_capacity)?),
            packages::departure_date.eq(format_date(details.travel_dates.start())),
            packages::return_date.eq(format_date(details.travel_dates.end())),
            packages::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Removes a package. Deleted pilgrims still pointing at it are unassigned
/// by the foreign key; any registration makes the delete fail.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_package(
    conn: &mut SqliteConnection,
    package_id: PackageId,
) -> Result<(), PersistenceError> {
    diesel::delete(packages::table.filter(packages::package_id.eq(package_id.value())))
        .execute(conn)?;
    Ok(())
}

/// Writes the seat counter.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn write_occupied_seats(
    conn: &mut SqliteConnection,
    package_id: PackageId,
    seats: SeatCount,
) -> Result<(), PersistenceError> {
    diesel::update(packages::table)
        .filter(packages::package_id.eq(package_id.value()))
        .set(packages::occupied_seats.eq(to_column(seats.value())?))
        .execute(conn)?;
    Ok(())
}
