// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The payment ledger: sole writer of a pilgrim's derived payment fields.

use crate::error::CoreError;
use crate::store::Transaction;
use jamaah_domain::{
    DomainError, Money, PaymentFigures, PaymentStatus, Pilgrim, PilgrimId,
    compute_payment_figures, total_payments,
};
use tracing::debug;

/// Derived payment fields ready to be written to a pilgrim row.
///
/// Only this module can construct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSummary(PaymentFigures);

impl PaymentSummary {
    /// Sum of all payments.
    #[must_use]
    pub const fn total_paid(&self) -> Money {
        self.0.total_paid
    }

    /// What is still owed.
    #[must_use]
    pub const fn remaining_balance(&self) -> Money {
        self.0.remaining_balance
    }

    /// Payment classification.
    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.0.status
    }

    /// The underlying figures.
    #[must_use]
    pub const fn figures(&self) -> PaymentFigures {
        self.0
    }
}

/// Recomputes and writes a pilgrim's payment aggregates.
///
/// Sums every payment regardless of verification and compares against the
/// price of the assigned package, or zero when none is assigned.
///
/// # Errors
///
/// Returns `PilgrimNotFound`, `InvalidField` on `amount` when the total
/// overflows, or a store error.
pub fn recalculate(
    tx: &mut dyn Transaction,
    pilgrim_id: PilgrimId,
) -> Result<PaymentSummary, CoreError> {
    let pilgrim: Pilgrim = tx
        .find_pilgrim(pilgrim_id)?
        .ok_or(DomainError::PilgrimNotFound(pilgrim_id))?;
    let price: Money = match pilgrim.package_id {
        Some(package_id) => tx
            .find_package(package_id)?
            .map_or(Money::ZERO, |package| package.price),
        None => Money::ZERO,
    };
    let total_paid: Money = total_payments(tx.list_payment_amounts(pilgrim_id)?)?;
    let summary: PaymentSummary = PaymentSummary(compute_payment_figures(total_paid, price));
    tx.write_payment_summary(pilgrim_id, &summary)?;
    debug!(
        pilgrim_id = pilgrim_id.value(),
        total_paid = summary.total_paid().minor(),
        remaining_balance = summary.remaining_balance().minor(),
        status = summary.status().as_str(),
        "Payment aggregates recalculated"
    );
    Ok(summary)
}
