// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::Transaction;
use jamaah_domain::{
    BookedTrip, DomainError, OverlapDecision, Package, PackageId, PilgrimId, evaluate_overlap,
};
use tracing::debug;

/// Decides whether a pilgrim may be registered on a package without
/// double-booking their travel dates.
///
/// Read-only.
///
/// # Arguments
///
/// * `tx` - The open transaction
/// * `pilgrim_id` - The pilgrim
/// * `package_id` - The candidate package
///
/// # Errors
///
/// Returns `PackageNotFound` if the candidate package does not exist, or a
/// store error.
pub fn can_register(
    tx: &mut dyn Transaction,
    pilgrim_id: PilgrimId,
    package_id: PackageId,
) -> Result<OverlapDecision, CoreError> {
    let package: Package = tx
        .find_package(package_id)?
        .ok_or(DomainError::PackageNotFound(package_id))?;
    let bookings: Vec<BookedTrip> = tx.active_bookings(pilgrim_id)?;
    let decision: OverlapDecision = evaluate_overlap(package_id, &package.travel_dates, &bookings);
    debug!(
        pilgrim_id = pilgrim_id.value(),
        package_id = package_id.value(),
        bookings = bookings.len(),
        allowed = decision.allowed,
        "Overlap check"
    );
    Ok(decision)
}
