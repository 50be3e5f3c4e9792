// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jamaah_domain::{Money, Payment, PaymentId, PilgrimId};

use crate::data_models::PaymentRow;
use crate::diesel_schema::payments;
use crate::error::PersistenceError;

/// Retrieves a payment by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_payment(
    conn: &mut SqliteConnection,
    payment_id: PaymentId,
) -> Result<Option<Payment>, PersistenceError> {
    payments::table
        .filter(payments::payment_id.eq(payment_id.value()))
        .select(PaymentRow::as_select())
        .first(conn)
        .optional()?
        .map(Payment::try_from)
        .transpose()
}

/// Loads the amount of every payment recorded for a pilgrim.
///
/// The caller totals them with overflow checking.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_payment_amounts(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
) -> Result<Vec<Money>, PersistenceError> {
    let amounts: Vec<i64> = payments::table
        .filter(payments::pilgrim_id.eq(pilgrim_id.value()))
        .select(payments::amount)
        .order(payments::payment_id.asc())
        .load(conn)?;
    Ok(amounts.into_iter().map(Money::from_minor).collect())
}

/// Lists a pilgrim's payments by payment date, then id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_payments(
    conn: &mut SqliteConnection,
    pilgrim_id: PilgrimId,
) -> Result<Vec<Payment>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::pilgrim_id.eq(pilgrim_id.value()))
        .select(PaymentRow::as_select())
        .order((payments::payment_date.asc(), payments::payment_id.asc()))
        .load(conn)?;
    rows.into_iter().map(Payment::try_from).collect()
}
