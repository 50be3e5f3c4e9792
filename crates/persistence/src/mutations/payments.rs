// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{PaymentDetails, PaymentId, PilgrimId, format_date};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::payments;
use crate::error::PersistenceError;

/// Inserts a payment.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_payment(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
    details: &PaymentDetails,
    created_by: &str,
    created_at: &str,
) -> Result<PaymentId, PersistenceError> {
    diesel::insert_into(payments::table)
        .values((
            payments::pilgrim_id.eq(pilgrim_id.value()),
            payments::amount.eq(details.amount.minor()),
            payments::payment_date.eq(format_date(details.payment_date)),
            payments::method.eq(details.method.as_str()),
            payments::reference_number.eq(details.reference_number.as_deref()),
            payments::notes.eq(details.notes.as_deref()),
            payments::receipt_ref.eq(details.receipt_ref.as_deref()),
            payments::created_by.eq(created_by),
            payments::created_at.eq(created_at),
            payments::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let payment_id: i64 = get_last_insert_rowid(conn)?;
    debug!(payment_id, pilgrim_id = pilgrim_id.value(), "Inserted payment");
    Ok(PaymentId::new(payment_id))
}

/// Overwrites a payment's details.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_payment(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
    details: &PaymentDetails,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(payments::table)
        .filter(payments::payment_id.eq(payment_id.value()))
        .set((
            payments::amount.eq(details.amount.minor()),
            payments::payment_date.eq(format_date(details.payment_date)),
            payments::method.eq(details.method.as_str()),
            payments::reference_number.eq(details.reference_number.as_deref()),
            payments::notes.eq(details.notes.as_deref()),
            payments::receipt_ref.eq(details.receipt_ref.as_deref()),
            payments::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Removes a payment.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_payment(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
) -> Result<(), PersistenceError> {
    diesel::delete(payments::table.filter(payments::payment_id.eq(payment_id.value())))
        .execute(conn)?;
    Ok(())
}

/// Stamps the verifier and verification time.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_payment_verified(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
    verified_by: &str,
    verified_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(payments::table)
        .filter(payments::payment_id.eq(payment_id.value()))
        .set((
            payments::verified_by.eq(Some(verified_by)),
            payments::verified_at.eq(Some(verified_at)),
            payments::updated_at.eq(verified_at),
        ))
        .execute(conn)?;
    Ok(())
}
