// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a pilgrim record.
    PilgrimId
);
entity_id!(
    /// Identifier of a travel package.
    PackageId
);
entity_id!(
    /// Identifier of a multi-package registration.
    RegistrationId
);
entity_id!(
    /// Identifier of a payment.
    PaymentId
);

/// An amount of money in minor currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, or `None` if the sum does not fit.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtracts `other`, clamping the result at zero.
    #[must_use]
    pub const fn clamped_sub(self, other: Self) -> Self {
        let diff: i64 = self.0.saturating_sub(other.0);
        if diff < 0 { Self(0) } else { Self(diff) }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 16-digit national identity number (NIK).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Required number of digits.
    pub const LENGTH: usize = 16;

    /// Parses a national ID.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is exactly 16 ASCII digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.len() != Self::LENGTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidField {
                field: "national_id",
                reason: format!("must be exactly {} digits", Self::LENGTH),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NationalId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(value: NationalId) -> Self {
        value.0
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A passport number, stored trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportNumber(String);

impl PassportNumber {
    /// Maximum accepted length.
    pub const MAX_LENGTH: usize = 50;

    /// Parses and normalises a passport number.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed value is empty, longer than 50
    /// characters, or contains characters other than ASCII letters and digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidField {
                field: "passport_number",
                reason: format!("must be between 1 and {} characters", Self::MAX_LENGTH),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidField {
                field: "passport_number",
                reason: String::from("may only contain letters and digits"),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalised value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PassportNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PassportNumber> for String {
    fn from(value: PassportNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for PassportNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pilgrim gender as recorded on travel documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    #[serde(rename = "M")]
    Male,
    /// Female.
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Returns the single-letter code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            _ => Err(DomainError::InvalidField {
                field: "gender",
                reason: format!("'{s}' is not one of M, F"),
            }),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a pilgrim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PilgrimStatus {
    /// Registered, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed.
    Active,
    /// Cancelled. Releases identity uniqueness and the package seat.
    Cancelled,
    /// Travel completed.
    Completed,
}

impl PilgrimStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns whether a pilgrim in this status holds a package seat and
    /// participates in identity uniqueness.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Checks whether a plain status change to `target` is permitted.
    ///
    /// Leaving `cancelled` is only possible through reactivation.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        !matches!(self, Self::Cancelled) || matches!(target, Self::Cancelled)
    }
}

impl FromStr for PilgrimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidField {
                field: "status",
                reason: format!("'{s}' is not a valid pilgrim status"),
            }),
        }
    }
}

impl std::fmt::Display for PilgrimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived payment classification of a pilgrim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid.
    #[default]
    Unpaid,
    /// Something paid, price not yet covered.
    Partial,
    /// Price fully covered.
    Paid,
}

impl PaymentStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidField {
                field: "payment_status",
                reason: format!("'{s}' is not a valid payment status"),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Debit or credit card.
    Card,
    /// Cheque.
    Check,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::Check => "check",
            Self::Other => "other",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "card" => Ok(Self::Card),
            "check" => Ok(Self::Check),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidField {
                field: "payment_method",
                reason: format!("'{s}' is not one of cash, transfer, card, check, other"),
            }),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a multi-package registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Counts toward overlap checks and occupancy.
    Active,
    /// Soft-cancelled.
    Cancelled,
}

impl RegistrationStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidField {
                field: "registration_status",
                reason: format!("'{s}' is not a valid registration status"),
            }),
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end` is before `start`.
    pub const fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end.to_julian_day() < start.to_julian_day() {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns whether two inclusive ranges share at least one day.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start.to_julian_day() <= other.end.to_julian_day()
            && other.start.to_julian_day() <= self.end.to_julian_day()
    }
}

/// The personal and document data of a pilgrim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilgrimProfile {
    /// Full legal name.
    pub full_name: String,
    /// Gender.
    pub gender: Gender,
    /// Date of birth.
    pub birth_date: Option<Date>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// National ID.
    pub national_id: Option<NationalId>,
    /// Passport number.
    pub passport_number: Option<PassportNumber>,
    /// Reference to the stored passport scan.
    pub passport_photo_ref: Option<String>,
    /// Free-form medical notes.
    pub medical_notes: Option<String>,
}

/// A pilgrim as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilgrim {
    /// Identifier.
    pub pilgrim_id: PilgrimId,
    /// Personal data.
    pub profile: PilgrimProfile,
    /// Lifecycle status.
    pub status: PilgrimStatus,
    /// Notes recorded with the last status change.
    pub status_notes: Option<String>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// When the record was soft-deleted.
    pub deleted_at: Option<String>,
    /// Package assigned through the single-package flow.
    pub package_id: Option<PackageId>,
    /// Sum of all payments.
    pub total_paid: Money,
    /// `max(0, price - total_paid)`.
    pub remaining_balance: Money,
    /// Derived payment classification.
    pub payment_status: PaymentStatus,
    /// Actor that created the record.
    pub created_by: String,
}

impl Pilgrim {
    /// Returns whether this pilgrim currently occupies a seat on `package_id`.
    #[must_use]
    pub fn is_attached_to(&self, package_id: PackageId) -> bool {
        !self.deleted && self.status.is_live() && self.package_id == Some(package_id)
    }

    /// Returns the package this pilgrim currently occupies a seat on, if any.
    #[must_use]
    pub fn attached_package(&self) -> Option<PackageId> {
        if !self.deleted && self.status.is_live() {
            self.package_id
        } else {
            None
        }
    }
}

/// A travel package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Identifier.
    pub package_id: PackageId,
    /// Unique business code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Price per pilgrim.
    pub price: Money,
    /// Total seats.
    pub total_capacity: u32,
    /// Seats taken by attached pilgrims.
    pub occupied_seats: u32,
    /// Departure through return, inclusive.
    pub travel_dates: DateRange,
}

impl Package {
    /// Returns the number of free seats.
    #[must_use]
    pub const fn available_seats(&self) -> u32 {
        self.total_capacity.saturating_sub(self.occupied_seats)
    }
}

/// A pilgrim's registration on a package in the multi-package flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Identifier.
    pub registration_id: RegistrationId,
    /// The pilgrim.
    pub pilgrim_id: PilgrimId,
    /// The package.
    pub package_id: PackageId,
    /// Status.
    pub status: RegistrationStatus,
    /// Actor that created the registration.
    pub created_by: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Identifier.
    pub payment_id: PaymentId,
    /// The paying pilgrim.
    pub pilgrim_id: PilgrimId,
    /// Amount paid.
    pub amount: Money,
    /// Day the payment was made.
    pub payment_date: Date,
    /// Payment method.
    pub method: PaymentMethod,
    /// Bank or receipt reference.
    pub reference_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Reference to the stored receipt file.
    pub receipt_ref: Option<String>,
    /// Actor that recorded the payment.
    pub created_by: String,
    /// Actor that verified the payment.
    pub verified_by: Option<String>,
    /// When the payment was verified.
    pub verified_at: Option<String>,
}
