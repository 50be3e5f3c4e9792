// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{NationalId, PackageId, PassportNumber, PaymentId, PilgrimId, PilgrimStatus};

/// Which identity document a uniqueness conflict was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// The 16-digit national identity number (NIK).
    NationalId,
    /// The passport number.
    PassportNumber,
}

impl IdentityField {
    /// Returns the wire name of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "national_id",
            Self::PassportNumber => "passport_number",
        }
    }
}

impl std::fmt::Display for IdentityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NationalId => write!(f, "national ID"),
            Self::PassportNumber => write!(f, "passport number"),
        }
    }
}

/// Errors that can occur during domain validation and rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field is present but its value is unacceptable.
    InvalidField {
        /// The wire name of the field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A field required by the active validation schema is missing.
    MissingField(&'static str),
    /// A field was supplied that the active validation schema does not accept.
    UnexpectedField(&'static str),
    /// Neither a national ID nor a passport number was supplied.
    MissingIdentity,
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The first day of the range.
        start: time::Date,
        /// The last day of the range.
        end: time::Date,
    },
    /// The national ID is held by another active pilgrim.
    DuplicateNationalId {
        /// The contested national ID.
        national_id: NationalId,
        /// The pilgrim currently holding it.
        pilgrim_id: PilgrimId,
    },
    /// The passport number is held by another active pilgrim.
    DuplicatePassportNumber {
        /// The contested passport number.
        passport_number: PassportNumber,
        /// The pilgrim currently holding it.
        pilgrim_id: PilgrimId,
    },
    /// The identity only collides with a cancelled pilgrim that may be reactivated.
    ReactivationCandidate {
        /// The cancelled pilgrim sharing the identity.
        pilgrim_id: PilgrimId,
        /// The field the collision was found on.
        field: IdentityField,
    },
    /// The candidate package's dates overlap an active registration.
    PackageOverlap {
        /// The package the pilgrim was being registered into.
        package_id: PackageId,
        /// The already-registered package whose dates collide.
        conflicting_package_id: PackageId,
        /// Human-readable description of the collision.
        reason: String,
    },
    /// The package has no free seat left.
    CapacityExceeded {
        /// The full package.
        package_id: PackageId,
        /// Total seat capacity.
        capacity: u32,
        /// Seats occupied (or demanded) at the time of the attempt.
        occupied: u32,
    },
    /// A package capacity change would drop below the seats already taken.
    CapacityBelowOccupied {
        /// The package being edited.
        package_id: PackageId,
        /// The requested capacity.
        capacity: u32,
        /// Seats currently occupied.
        occupied: u32,
    },
    /// Another package already uses this code.
    DuplicatePackageCode(String),
    /// Pilgrim does not exist or has been deleted.
    PilgrimNotFound(PilgrimId),
    /// Package does not exist.
    PackageNotFound(PackageId),
    /// Payment does not exist.
    PaymentNotFound(PaymentId),
    /// No active registration links the pilgrim to the package.
    RegistrationNotFound {
        /// The pilgrim.
        pilgrim_id: PilgrimId,
        /// The package.
        package_id: PackageId,
    },
    /// The requested lifecycle status change is not permitted.
    InvalidStatusTransition {
        /// The pilgrim's current status.
        from: PilgrimStatus,
        /// The requested status.
        to: PilgrimStatus,
    },
    /// A package cannot be deleted while any pilgrim or registration refers to it.
    PackageInUse {
        /// The package.
        package_id: PackageId,
        /// Non-deleted pilgrims assigned through the single-package flow.
        assigned_pilgrims: u32,
        /// Registrations from the multi-package flow, cancelled ones included.
        registrations: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::MissingField(field) => write!(f, "Missing required field '{field}'"),
            Self::UnexpectedField(field) => {
                write!(f, "Field '{field}' is not accepted by this operation")
            }
            Self::MissingIdentity => {
                write!(f, "Either a national ID or a passport number is required")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Date range ends ({end}) before it starts ({start})")
            }
            Self::DuplicateNationalId {
                national_id,
                pilgrim_id,
            } => write!(
                f,
                "National ID '{national_id}' is already registered to pilgrim {pilgrim_id}"
            ),
            Self::DuplicatePassportNumber {
                passport_number,
                pilgrim_id,
            } => write!(
                f,
                "Passport number '{passport_number}' is already registered to pilgrim {pilgrim_id}"
            ),
            Self::ReactivationCandidate { pilgrim_id, field } => write!(
                f,
                "The {field} belongs to cancelled pilgrim {pilgrim_id}, which may be reactivated"
            ),
            Self::PackageOverlap { reason, .. } => write!(f, "{reason}"),
            Self::CapacityExceeded {
                package_id,
                capacity,
                occupied,
            } => write!(
                f,
                "Package {package_id} is full: {occupied} of {capacity} seats taken"
            ),
            Self::CapacityBelowOccupied {
                package_id,
                capacity,
                occupied,
            } => write!(
                f,
                "Package {package_id} capacity cannot be set to {capacity}: {occupied} seats are occupied"
            ),
            Self::DuplicatePackageCode(code) => {
                write!(f, "Package code '{code}' is already in use")
            }
            Self::PilgrimNotFound(id) => write!(f, "Pilgrim {id} not found"),
            Self::PackageNotFound(id) => write!(f, "Package {id} not found"),
            Self::PaymentNotFound(id) => write!(f, "Payment {id} not found"),
            Self::RegistrationNotFound {
                pilgrim_id,
                package_id,
            } => write!(
                f,
                "No active registration of pilgrim {pilgrim_id} on package {package_id}"
            ),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change pilgrim status from '{from}' to '{to}'")
            }
            Self::PackageInUse {
                package_id,
                assigned_pilgrims,
                registrations,
            } => write!(
                f,
                "Package {package_id} cannot be deleted: {assigned_pilgrims} pilgrims assigned, {registrations} registrations"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
