// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Money, PaymentStatus};
use serde::{Deserialize, Serialize};

/// The derived payment fields of a pilgrim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFigures {
    /// Sum of all payments.
    pub total_paid: Money,
    /// What is still owed, never negative.
    pub remaining_balance: Money,
    /// Classification.
    pub status: PaymentStatus,
}

/// Classifies a pilgrim's payments against the price of their package.
///
/// - nothing paid is `unpaid`
/// - paid at least the price, with a non-zero price, is `paid`
/// - anything else is `partial`, including payments against a zero price
///
/// # Arguments
///
/// * `total_paid` - Sum of every payment, verified or not
/// * `price` - Price of the assigned package, zero when none
#[must_use]
pub const fn compute_payment_figures(total_paid: Money, price: Money) -> PaymentFigures {
    let status: PaymentStatus = if total_paid.is_zero() {
        PaymentStatus::Unpaid
    } else if price.minor() > 0 && total_paid.minor() >= price.minor() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    };

    PaymentFigures {
        total_paid,
        remaining_balance: price.clamped_sub(total_paid),
        status,
    }
}

/// Adds up a pilgrim's payment amounts.
///
/// # Errors
///
/// Returns `InvalidField` on `amount` when the total leaves the range of
/// [`Money`].
pub fn total_payments<I>(amounts: I) -> Result<Money, DomainError>
where
    I: IntoIterator<Item = Money>,
{
    amounts
        .into_iter()
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or_else(|| DomainError::InvalidField {
            field: "amount",
            reason: String::from("total paid would exceed the largest representable amount"),
        })
}
