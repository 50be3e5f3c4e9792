// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod identity;
mod overlap;
mod payment;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{DomainError, IdentityField};
pub use identity::{IdentityCheck, IdentityMatch, assess_identity};
pub use overlap::{BookedTrip, OverlapDecision, evaluate_overlap};
pub use payment::{PaymentFigures, compute_payment_figures, total_payments};

// Re-export public types
pub use types::{
    DateRange, Gender, Money, NationalId, Package, PackageId, PassportNumber, Payment, PaymentId,
    PaymentMethod, PaymentStatus, Pilgrim, PilgrimId, PilgrimProfile, PilgrimStatus, Registration,
    RegistrationId, RegistrationStatus,
};
pub use validation::{
    FieldRule, IdentityRequirement, PackageDetails, PackageDraft, PaymentDetails, PaymentDraft,
    PilgrimChanges, PilgrimDraft, PilgrimField, PilgrimPatch, Presence, RegistrationFlow,
    ValidatedPilgrim, ValidationSchema, format_date, parse_date, validate_package,
    validate_payment, validate_pilgrim, validate_pilgrim_patch,
};
