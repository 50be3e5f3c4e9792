// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jamaah_domain::DomainError;

/// Stable, distinguishable error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input, rejected before any write.
    Validation,
    /// National ID or passport number already held by a live pilgrim.
    DuplicateIdentity,
    /// The identity belongs to a cancelled pilgrim that may be reactivated.
    ReactivationCandidate,
    /// Travel dates collide with an active registration.
    OverlapConflict,
    /// The package is full.
    CapacityExceeded,
    /// A referenced record does not exist.
    NotFound,
    /// The requested status change is not permitted.
    InvalidTransition,
    /// The package still has pilgrims attached.
    PackageInUse,
    /// The store failed.
    Store,
}

impl ErrorKind {
    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::DuplicateIdentity => "DuplicateIdentity",
            Self::ReactivationCandidate => "ReactivationCandidate",
            Self::OverlapConflict => "OverlapConflict",
            Self::CapacityExceeded => "CapacityExceeded",
            Self::NotFound => "NotFound",
            Self::InvalidTransition => "InvalidTransition",
            Self::PackageInUse => "PackageInUse",
            Self::Store => "Store",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failures reported by a `Store` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique index rejected the write.
    UniqueViolation(String),
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::Backend(msg) => write!(f, "Store failure: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur while running an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The store failed; the transaction was rolled back.
    Store(StoreError),
}

impl CoreError {
    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainViolation(err) => match err {
                DomainError::InvalidField { .. }
                | DomainError::MissingField(_)
                | DomainError::UnexpectedField(_)
                | DomainError::MissingIdentity
                | DomainError::InvalidDateRange { .. }
                | DomainError::CapacityBelowOccupied { .. }
                | DomainError::DuplicatePackageCode(_) => ErrorKind::Validation,
                DomainError::DuplicateNationalId { .. }
                | DomainError::DuplicatePassportNumber { .. } => ErrorKind::DuplicateIdentity,
                DomainError::ReactivationCandidate { .. } => ErrorKind::ReactivationCandidate,
                DomainError::PackageOverlap { .. } => ErrorKind::OverlapConflict,
                DomainError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
                DomainError::PilgrimNotFound(_)
                | DomainError::PackageNotFound(_)
                | DomainError::PaymentNotFound(_)
                | DomainError::RegistrationNotFound { .. } => ErrorKind::NotFound,
                DomainError::InvalidStatusTransition { .. } => ErrorKind::InvalidTransition,
                DomainError::PackageInUse { .. } => ErrorKind::PackageInUse,
            },
            Self::Store(StoreError::UniqueViolation(_)) => ErrorKind::DuplicateIdentity,
            Self::Store(StoreError::Backend(_)) => ErrorKind::Store,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
