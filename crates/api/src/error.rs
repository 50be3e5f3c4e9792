// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use jamaah_core::{CoreError, ErrorKind, StoreError};
use jamaah_domain::DomainError;
use thiserror::Error;

/// A malformed batch request, rejected before any item runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkRequestError {
    #[error("Batch of {count} items exceeds the limit of {max}")]
    TooManyItems { count: usize, max: usize },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request did not identify its actor.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The stable kind of the violated rule.
        kind: ErrorKind,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable error kind reported to clients.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } | Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::DomainRuleViolation { kind, .. } => *kind,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Store,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::DomainRuleViolation { kind, message } => {
                write!(f, "Domain rule violation ({kind}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<BulkRequestError> for ApiError {
    fn from(err: BulkRequestError) -> Self {
        Self::InvalidInput {
            field: String::from("items"),
            message: err.to_string(),
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn violation(kind: ErrorKind, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        kind,
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidField { field, .. }
        | DomainError::MissingField(field)
        | DomainError::UnexpectedField(field) => invalid(field, &err),
        DomainError::MissingIdentity => invalid("national_id", &err),
        DomainError::InvalidDateRange { .. } => invalid("return_date", &err),
        DomainError::CapacityBelowOccupied { .. } => invalid("total_capacity", &err),
        DomainError::DuplicatePackageCode(_) => invalid("code", &err),
        DomainError::DuplicateNationalId { .. } | DomainError::DuplicatePassportNumber { .. } => {
            violation(ErrorKind::DuplicateIdentity, &err)
        }
        DomainError::ReactivationCandidate { .. } => {
            violation(ErrorKind::ReactivationCandidate, &err)
        }
        DomainError::PackageOverlap { .. } => violation(ErrorKind::OverlapConflict, &err),
        DomainError::CapacityExceeded { .. } => violation(ErrorKind::CapacityExceeded, &err),
        DomainError::InvalidStatusTransition { .. } => {
            violation(ErrorKind::InvalidTransition, &err)
        }
        DomainError::PackageInUse { .. } => violation(ErrorKind::PackageInUse, &err),
        DomainError::PilgrimNotFound(_) => not_found("Pilgrim", &err),
        DomainError::PackageNotFound(_) => not_found("Package", &err),
        DomainError::PaymentNotFound(_) => not_found("Payment", &err),
        DomainError::RegistrationNotFound { .. } => not_found("Registration", &err),
    }
}

/// Translates a core error into an API error.
///
/// A unique-index violation is an identity collision the engine's own
/// check did not see; it is reported as such.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(StoreError::UniqueViolation(message)) => ApiError::DomainRuleViolation {
            kind: ErrorKind::DuplicateIdentity,
            message,
        },
        CoreError::Store(StoreError::Backend(message)) => ApiError::Internal { message },
    }
}
