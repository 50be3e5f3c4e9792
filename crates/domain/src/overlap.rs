// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DateRange, PackageId, RegistrationId};
use serde::{Deserialize, Serialize};

/// An active registration together with its package's travel dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedTrip {
    /// The registration.
    pub registration_id: RegistrationId,
    /// The registered package.
    pub package_id: PackageId,
    /// The package's travel dates.
    pub travel_dates: DateRange,
}

/// Outcome of checking a candidate package against a pilgrim's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapDecision {
    /// Whether the registration may proceed.
    pub allowed: bool,
    /// Why the registration was refused.
    pub reason: Option<String>,
    /// The registration that blocks the candidate.
    pub conflicting_registration: Option<RegistrationId>,
    /// The package of the blocking registration.
    pub conflicting_package: Option<PackageId>,
}

impl OverlapDecision {
    /// A decision allowing the registration.
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            conflicting_registration: None,
            conflicting_package: None,
        }
    }

    /// Converts a refusal into a `DomainError::PackageOverlap`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PackageOverlap` when the decision is a refusal.
    pub fn into_result(self, package_id: PackageId) -> Result<(), DomainError> {
        if self.allowed {
            return Ok(());
        }
        Err(DomainError::PackageOverlap {
            package_id,
            conflicting_package_id: self.conflicting_package.unwrap_or(package_id),
            reason: self
                .reason
                .unwrap_or_else(|| format!("Package {package_id} overlaps an existing booking")),
        })
    }
}

/// Checks a candidate package's dates against a pilgrim's active bookings.
///
/// `booked` must be in creation order; the first conflict in that order is
/// reported. Ranges are inclusive on both ends, so trips sharing a single
/// day conflict. A booking on the candidate package itself always conflicts.
///
/// # Arguments
///
/// * `candidate_id` - The package being registered
/// * `candidate_dates` - Its travel dates
/// * `booked` - The pilgrim's active bookings
#[must_use]
pub fn evaluate_overlap(
    candidate_id: PackageId,
    candidate_dates: &DateRange,
    booked: &[BookedTrip],
) -> OverlapDecision {
    let Some(conflict) = booked.iter().find(|trip| {
        trip.package_id == candidate_id || trip.travel_dates.overlaps(candidate_dates)
    }) else {
        return OverlapDecision::allowed();
    };

    let reason: String = if conflict.package_id == candidate_id {
        format!("Pilgrim is already registered on package {candidate_id}")
    } else {
        format!(
            "Package {candidate_id} ({} to {}) overlaps registered package {} ({} to {})",
            candidate_dates.start(),
            candidate_dates.end(),
            conflict.package_id,
            conflict.travel_dates.start(),
            conflict.travel_dates.end(),
        )
    };

    OverlapDecision {
        allowed: false,
        reason: Some(reason),
        conflicting_registration: Some(conflict.registration_id),
        conflicting_package: Some(conflict.package_id),
    }
}
