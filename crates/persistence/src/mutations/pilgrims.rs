// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_core::{NewPilgrim, PaymentSummary};
use jamaah_domain::{PackageId, PilgrimId, PilgrimProfile, PilgrimStatus, format_date};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::pilgrims;
use crate::error::PersistenceError;

/// Personal columns of a pilgrim row, shared by insert and update.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = pilgrims)]
#[diesel(treat_none_as_null = true)]
struct ProfileValues<'a> {
    full_name: &'a str,
    gender: &'a str,
    birth_date: Option<String>,
    phone: Option<&'a str>,
    email: Option<&'a str>,
    address: Option<&'a str>,
    national_id: Option<&'a str>,
    passport_number: Option<&'a str>,
    passport_photo_ref: Option<&'a str>,
    medical_notes: Option<&'a str>,
}

impl<'a> From<&'a PilgrimProfile> for ProfileValues<'a> {
    fn from(profile: &'a PilgrimProfile) -> Self {
        Self {
            full_name: &profile.full_name,
            gender: profile.gender.as_str(),
            birth_date: profile.birth_date.map(format_date),
            phone: profile.phone.as_deref(),
            email: profile.email.as_deref(),
            address: profile.address.as_deref(),
            national_id: profile.national_id.as_ref().map(|id| id.as_str()),
            passport_number: profile.passport_number.as_ref().map(|p| p.as_str()),
            passport_photo_ref: profile.passport_photo_ref.as_deref(),
            medical_notes: profile.medical_notes.as_deref(),
        }
    }
}

/// Inserts a pilgrim with zeroed payment aggregates.
///
/// # Returns
///
/// The id assigned by the database.
///
/// # Errors
///
/// Returns `UniqueViolation` if a live pilgrim already holds one of the
/// identity documents, or another error if the insert fails.
pub fn insert_pilgrim(
    conn: &mut SqliteConnection,
    pilgrim: &NewPilgrim<'_>,
) -> Result<PilgrimId, PersistenceError> {
    diesel::insert_into(pilgrims::table)
        .values((
            ProfileValues::from(pilgrim.profile),
            pilgrims::status.eq(pilgrim.status.as_str()),
            pilgrims::package_id.eq(pilgrim.package_id.map(|id| id.value())),
            pilgrims::created_by.eq(pilgrim.created_by),
            pilgrims::created_at.eq(pilgrim.created_at),
            pilgrims::updated_at.eq(pilgrim.created_at),
        ))
        .execute(conn)?;

    let pilgrim_id: i64 = get_last_insert_rowid(conn)?;
    debug!(pilgrim_id, "Inserted pilgrim");
    Ok(PilgrimId::new(pilgrim_id))
}

/// Overwrites the personal columns of a pilgrim.
///
/// # Errors
///
/// Returns `UniqueViolation` on an identity collision, or another error if
/// the update fails.
pub fn update_pilgrim_profile(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    profile: &PilgrimProfile,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(pilgrims::table)
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .set((
            ProfileValues::from(profile),
            pilgrims::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Sets or clears the package assignment.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_pilgrim_package(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    package_id: Option<PackageId>,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(pilgrims::table)
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .set((
            pilgrims::package_id.eq(package_id.map(|id| id.value())),
            pilgrims::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Sets the lifecycle status and its notes.
///
/// # Errors
///
/// Returns `UniqueViolation` when leaving `cancelled` collides with a live
/// identity, or another error if the update fails.
pub fn set_pilgrim_status(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    status: PilgrimStatus,
    notes: Option<&str>,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(pilgrims::table)
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .set((
            pilgrims::status.eq(status.as_str()),
            pilgrims::status_notes.eq(notes),
            pilgrims::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Soft-deletes a pilgrim.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_pilgrim_deleted(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    deleted_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(pilgrims::table)
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .set((
            pilgrims::is_deleted.eq(1),
            pilgrims::deleted_at.eq(Some(deleted_at)),
            pilgrims::updated_at.eq(deleted_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Writes the derived payment columns.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn write_payment_summary(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    summary: &PaymentSummary,
) -> Result<(), PersistenceError> {
    diesel::update(pilgrims::table)
        .filter(pilgrims::pilgrim_id.eq(pilgrim_id.value()))
        .set((
            pilgrims::total_paid.eq(summary.total_paid().minor()),
            pilgrims::remaining_balance.eq(summary.remaining_balance().minor()),
            pilgrims::payment_status.eq(summary.status().as_str()),
        ))
        .execute(conn)?;
    Ok(())
}
