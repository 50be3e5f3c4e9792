// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The capacity ledger: sole writer of a package's occupied-seat counter.

use crate::error::CoreError;
use crate::store::Transaction;
use jamaah_domain::{DomainError, Package, PackageId, Pilgrim, PilgrimId};
use tracing::debug;

/// A seat count ready to be written to a package row.
///
/// Only this module can construct one, so no other code path can write the
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCount(u32);

impl SeatCount {
    const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the number of occupied seats.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// On-demand occupancy of a package in the multi-package flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOccupancy {
    pub package_id: PackageId,
    pub total_capacity: u32,
    pub active_registrations: u32,
    pub available: u32,
}

fn load_for_update(tx: &mut dyn Transaction, package_id: PackageId) -> Result<Package, CoreError> {
    Ok(tx
        .lock_package(package_id)?
        .ok_or(DomainError::PackageNotFound(package_id))?)
}

/// Takes one seat on a package for a pilgrim.
///
/// The counter is re-read inside the transaction, so the capacity check and
/// the increment see the same value.
///
/// # Errors
///
/// Returns `PackageNotFound`, `CapacityExceeded`, or a store error.
pub fn attach(
    tx: &mut dyn Transaction,
    pilgrim_id: PilgrimId,
    package_id: PackageId,
) -> Result<SeatCount, CoreError> {
    let package: Package = load_for_update(tx, package_id)?;
    if package.occupied_seats >= package.total_capacity {
        return Err(DomainError::CapacityExceeded {
            package_id,
            capacity: package.total_capacity,
            occupied: package.occupied_seats,
        }
        .into());
    }
    let seats: SeatCount = SeatCount::new(package.occupied_seats + 1);
    tx.write_occupied_seats(package_id, seats)?;
    debug!(
        pilgrim_id = pilgrim_id.value(),
        package_id = package_id.value(),
        occupied = seats.value(),
        capacity = package.total_capacity,
        "Seat attached"
    );
    Ok(seats)
}

/// Releases a pilgrim's seat on a package.
///
/// Must be called before the pilgrim row is changed. Does nothing unless
/// the pilgrim currently holds a seat on that package, and never takes the
/// counter below zero. Returns whether a seat was released.
///
/// # Errors
///
/// Returns a store error.
pub fn detach(
    tx: &mut dyn Transaction,
    pilgrim_id: PilgrimId,
    package_id: PackageId,
) -> Result<bool, CoreError> {
    let attached: bool = tx
        .find_pilgrim(pilgrim_id)?
        .is_some_and(|pilgrim: Pilgrim| pilgrim.is_attached_to(package_id));
    if !attached {
        debug!(
            pilgrim_id = pilgrim_id.value(),
            package_id = package_id.value(),
            "Detach skipped, pilgrim not attached"
        );
        return Ok(false);
    }
    let Some(package) = tx.lock_package(package_id)? else {
        return Ok(false);
    };
    let seats: SeatCount = SeatCount::new(package.occupied_seats.saturating_sub(1));
    tx.write_occupied_seats(package_id, seats)?;
    debug!(
        pilgrim_id = pilgrim_id.value(),
        package_id = package_id.value(),
        occupied = seats.value(),
        "Seat detached"
    );
    Ok(true)
}

/// Rebuilds a package's counter from the pilgrims actually attached to it.
///
/// # Errors
///
/// Returns `PackageNotFound`, `CapacityExceeded` when more pilgrims are
/// attached than the package holds, or a store error.
pub fn recompute(tx: &mut dyn Transaction, package_id: PackageId) -> Result<SeatCount, CoreError> {
    let package: Package = load_for_update(tx, package_id)?;
    let attached: u32 = tx.count_attached_pilgrims(package_id)?;
    if attached > package.total_capacity {
        return Err(DomainError::CapacityExceeded {
            package_id,
            capacity: package.total_capacity,
            occupied: attached,
        }
        .into());
    }
    let seats: SeatCount = SeatCount::new(attached);
    tx.write_occupied_seats(package_id, seats)?;
    debug!(
        package_id = package_id.value(),
        previous = package.occupied_seats,
        occupied = attached,
        "Seat counter recomputed"
    );
    Ok(seats)
}

/// Computes registration occupancy for the multi-package flow.
///
/// # Errors
///
/// Returns `PackageNotFound` or a store error.
pub fn registration_occupancy(
    tx: &mut dyn Transaction,
    package_id: PackageId,
) -> Result<RegistrationOccupancy, CoreError> {
    let package: Package = tx
        .find_package(package_id)?
        .ok_or(DomainError::PackageNotFound(package_id))?;
    let active_registrations: u32 = tx.count_active_registrations(package_id)?;
    Ok(RegistrationOccupancy {
        package_id,
        total_capacity: package.total_capacity,
        active_registrations,
        available: package.total_capacity.saturating_sub(active_registrations),
    })
}
