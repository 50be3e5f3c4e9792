// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{PackageId, PilgrimId, RegistrationId, RegistrationStatus};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::package_registrations;
use crate::error::PersistenceError;

/// Inserts an active registration.
///
/// # Errors
///
/// Returns `UniqueViolation` if the pilgrim already holds an active
/// registration on the package, or another error if the insert fails.
pub fn insert_registration(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    package_id: PackageId,
    created_by: &str,
    created_at: &str,
) -> Result<RegistrationId, PersistenceError> {
    diesel::insert_into(package_registrations::table)
        .values((
            package_registrations::pilgrim_id.eq(pilgrim_id.value()),
            package_registrations::package_id.eq(package_id.value()),
            package_registrations::status.eq(RegistrationStatus::Active.as_str()),
            package_registrations::created_by.eq(created_by),
            package_registrations::created_at.eq(created_at),
            package_registrations::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let registration_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        registration_id,
        pilgrim_id = pilgrim_id.value(),
        package_id = package_id.value(),
        "Inserted registration"
    );
    Ok(RegistrationId::new(registration_id))
}

/// Flips a registration to cancelled.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn cancel_registration(
    conn: &mut SqliteConnection,
    registration_id: RegistrationId,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(package_registrations::table)
        .filter(package_registrations::registration_id.eq(registration_id.value()))
        .set((
            package_registrations::status.eq(RegistrationStatus::Cancelled.as_str()),
            package_registrations::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}
