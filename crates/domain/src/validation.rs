// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of raw input into strongly typed records.
//!
//! Each registration flow carries a tagged schema stating which pilgrim
//! fields are required, optional, or forbidden, and which identity
//! documents must be present. Validation is a pure function from a raw
//! draft to a typed record; nothing here touches the store.

use crate::error::DomainError;
use crate::types::{
    DateRange, Gender, Money, NationalId, PackageId, PassportNumber, PaymentMethod,
    PilgrimProfile,
};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

const FULL_NAME_MIN: usize = 2;
const FULL_NAME_MAX: usize = 255;
const PHONE_MAX: usize = 20;
const EMAIL_MAX: usize = 255;
const ADDRESS_MAX: usize = 1000;
const MEDICAL_NOTES_MAX: usize = 2000;
const FILE_REF_MAX: usize = 500;
const REFERENCE_NUMBER_MAX: usize = 100;
const PAYMENT_NOTES_MAX: usize = 1000;
const PACKAGE_CODE_MAX: usize = 50;
const PACKAGE_NAME_MAX: usize = 255;

/// Fields of a pilgrim registration payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PilgrimField {
    /// `full_name`
    FullName,
    /// `gender`
    Gender,
    /// `birth_date`
    BirthDate,
    /// `phone`
    Phone,
    /// `email`
    Email,
    /// `address`
    Address,
    /// `national_id`
    NationalId,
    /// `passport_number`
    PassportNumber,
    /// `passport_photo_ref`
    PassportPhotoRef,
    /// `medical_notes`
    MedicalNotes,
    /// `package_id`
    PackageId,
    /// `package_ids`
    PackageIds,
}

impl PilgrimField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Gender => "gender",
            Self::BirthDate => "birth_date",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::NationalId => "national_id",
            Self::PassportNumber => "passport_number",
            Self::PassportPhotoRef => "passport_photo_ref",
            Self::MedicalNotes => "medical_notes",
            Self::PackageId => "package_id",
            Self::PackageIds => "package_ids",
        }
    }

    fn is_present(self, draft: &PilgrimDraft) -> bool {
        match self {
            Self::FullName => has_text(draft.full_name.as_deref()),
            Self::Gender => has_text(draft.gender.as_deref()),
            Self::BirthDate => has_text(draft.birth_date.as_deref()),
            Self::Phone => has_text(draft.phone.as_deref()),
            Self::Email => has_text(draft.email.as_deref()),
            Self::Address => has_text(draft.address.as_deref()),
            Self::NationalId => has_text(draft.national_id.as_deref()),
            Self::PassportNumber => has_text(draft.passport_number.as_deref()),
            Self::PassportPhotoRef => has_text(draft.passport_photo_ref.as_deref()),
            Self::MedicalNotes => has_text(draft.medical_notes.as_deref()),
            Self::PackageId => draft.package_id.is_some(),
            Self::PackageIds => draft.package_ids.as_ref().is_some_and(|ids| !ids.is_empty()),
        }
    }
}

/// Whether a field must, may, or must not be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-empty.
    Required,
    /// May be omitted.
    Optional,
    /// Must not be supplied.
    Forbidden,
}

/// A presence rule for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// The field.
    pub field: PilgrimField,
    /// Its presence rule.
    pub presence: Presence,
}

/// Which identity documents a flow demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRequirement {
    /// A national ID is mandatory.
    NationalId,
    /// At least one of national ID and passport number.
    NationalIdOrPassport,
}

/// A tagged validation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSchema {
    /// Field presence rules.
    pub rules: &'static [FieldRule],
    /// Identity requirement.
    pub identity: IdentityRequirement,
}

const fn rule(field: PilgrimField, presence: Presence) -> FieldRule {
    FieldRule { field, presence }
}

static SINGLE_PACKAGE_SCHEMA: ValidationSchema = ValidationSchema {
    rules: &[
        rule(PilgrimField::FullName, Presence::Required),
        rule(PilgrimField::Gender, Presence::Required),
        rule(PilgrimField::BirthDate, Presence::Optional),
        rule(PilgrimField::Phone, Presence::Optional),
        rule(PilgrimField::Email, Presence::Optional),
        rule(PilgrimField::Address, Presence::Optional),
        rule(PilgrimField::NationalId, Presence::Required),
        rule(PilgrimField::PassportNumber, Presence::Optional),
        rule(PilgrimField::PassportPhotoRef, Presence::Optional),
        rule(PilgrimField::MedicalNotes, Presence::Optional),
        rule(PilgrimField::PackageId, Presence::Optional),
        rule(PilgrimField::PackageIds, Presence::Forbidden),
    ],
    identity: IdentityRequirement::NationalId,
};

static MULTI_PACKAGE_SCHEMA: ValidationSchema = ValidationSchema {
    rules: &[
        rule(PilgrimField::FullName, Presence::Required),
        rule(PilgrimField::Gender, Presence::Required),
        rule(PilgrimField::BirthDate, Presence::Optional),
        rule(PilgrimField::Phone, Presence::Optional),
        rule(PilgrimField::Email, Presence::Optional),
        rule(PilgrimField::Address, Presence::Optional),
        rule(PilgrimField::NationalId, Presence::Optional),
        rule(PilgrimField::PassportNumber, Presence::Optional),
        rule(PilgrimField::PassportPhotoRef, Presence::Optional),
        rule(PilgrimField::MedicalNotes, Presence::Optional),
        rule(PilgrimField::PackageId, Presence::Forbidden),
        rule(PilgrimField::PackageIds, Presence::Optional),
    ],
    identity: IdentityRequirement::NationalIdOrPassport,
};

/// The two pilgrim registration flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFlow {
    /// One package held on the pilgrim row; seats tracked by the capacity counter.
    SinglePackage,
    /// Zero or more registrations; occupancy computed on demand.
    MultiPackage,
}

impl RegistrationFlow {
    /// Returns the validation schema for this flow.
    #[must_use]
    pub fn schema(self) -> &'static ValidationSchema {
        match self {
            Self::SinglePackage => &SINGLE_PACKAGE_SCHEMA,
            Self::MultiPackage => &MULTI_PACKAGE_SCHEMA,
        }
    }
}

/// Raw pilgrim registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PilgrimDraft {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub passport_number: Option<String>,
    pub passport_photo_ref: Option<String>,
    pub medical_notes: Option<String>,
    pub package_id: Option<i64>,
    pub package_ids: Option<Vec<i64>>,
}

/// A pilgrim payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPilgrim {
    /// Personal data.
    pub profile: PilgrimProfile,
    /// Package for the single-package flow.
    pub package_id: Option<PackageId>,
    /// Packages for the multi-package flow, in request order.
    pub package_ids: Vec<PackageId>,
}

/// Validates a registration payload against a flow's schema.
///
/// # Arguments
///
/// * `flow` - The registration flow whose schema applies
/// * `draft` - The raw payload
///
/// # Errors
///
/// Returns an error if:
/// - A required field is missing or a forbidden one is present
/// - The identity requirement of the flow is not met
/// - Any field fails its format or length rule
pub fn validate_pilgrim(
    flow: RegistrationFlow,
    draft: &PilgrimDraft,
) -> Result<ValidatedPilgrim, DomainError> {
    let schema: &ValidationSchema = flow.schema();
    for field_rule in schema.rules {
        let present: bool = field_rule.field.is_present(draft);
        match field_rule.presence {
            Presence::Required if !present => {
                return Err(DomainError::MissingField(field_rule.field.as_str()));
            }
            Presence::Forbidden if present => {
                return Err(DomainError::UnexpectedField(field_rule.field.as_str()));
            }
            _ => {}
        }
    }

    let has_national_id: bool = PilgrimField::NationalId.is_present(draft);
    let has_passport: bool = PilgrimField::PassportNumber.is_present(draft);
    match schema.identity {
        IdentityRequirement::NationalId if !has_national_id => {
            return Err(DomainError::MissingField(PilgrimField::NationalId.as_str()));
        }
        IdentityRequirement::NationalIdOrPassport if !has_national_id && !has_passport => {
            return Err(DomainError::MissingIdentity);
        }
        _ => {}
    }

    let profile: PilgrimProfile = PilgrimProfile {
        full_name: parse_full_name(draft.full_name.as_deref().unwrap_or_default())?,
        gender: Gender::from_str(draft.gender.as_deref().unwrap_or_default().trim())?,
        birth_date: optional(draft.birth_date.as_deref())
            .map(|v| parse_date("birth_date", v))
            .transpose()?,
        phone: bounded_text("phone", draft.phone.as_deref(), PHONE_MAX)?,
        email: optional(draft.email.as_deref()).map(parse_email).transpose()?,
        address: bounded_text("address", draft.address.as_deref(), ADDRESS_MAX)?,
        national_id: optional(draft.national_id.as_deref())
            .map(NationalId::parse)
            .transpose()?,
        passport_number: optional(draft.passport_number.as_deref())
            .map(PassportNumber::parse)
            .transpose()?,
        passport_photo_ref: bounded_text(
            "passport_photo_ref",
            draft.passport_photo_ref.as_deref(),
            FILE_REF_MAX,
        )?,
        medical_notes: bounded_text(
            "medical_notes",
            draft.medical_notes.as_deref(),
            MEDICAL_NOTES_MAX,
        )?,
    };

    let package_id: Option<PackageId> = draft.package_id.map(parse_package_id).transpose()?;
    let package_ids: Vec<PackageId> = draft
        .package_ids
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|id| parse_package_id(*id))
        .collect::<Result<_, _>>()?;

    Ok(ValidatedPilgrim {
        profile,
        package_id,
        package_ids,
    })
}

/// Raw pilgrim update payload.
///
/// An absent field is left unchanged. For optional fields an empty string
/// clears the stored value. `package_id: null` unassigns the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PilgrimPatch {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub passport_number: Option<String>,
    pub passport_photo_ref: Option<String>,
    pub medical_notes: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub package_id: Option<Option<i64>>,
}

/// A validated field diff.
///
/// The outer `Option` is "changed or not"; for clearable fields the inner
/// `Option` is the new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PilgrimChanges {
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<Option<Date>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub national_id: Option<Option<NationalId>>,
    pub passport_number: Option<Option<PassportNumber>>,
    pub passport_photo_ref: Option<Option<String>>,
    pub medical_notes: Option<Option<String>>,
    pub package_id: Option<Option<PackageId>>,
}

impl PilgrimChanges {
    /// Applies the diff to a profile.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingIdentity` if the result would carry
    /// neither a national ID nor a passport number.
    pub fn apply_to(&self, current: &PilgrimProfile) -> Result<PilgrimProfile, DomainError> {
        let merged: PilgrimProfile = PilgrimProfile {
            full_name: self
                .full_name
                .clone()
                .unwrap_or_else(|| current.full_name.clone()),
            gender: self.gender.unwrap_or(current.gender),
            birth_date: self.birth_date.unwrap_or(current.birth_date),
            phone: pick(self.phone.as_ref(), current.phone.as_ref()),
            email: pick(self.email.as_ref(), current.email.as_ref()),
            address: pick(self.address.as_ref(), current.address.as_ref()),
            national_id: pick(self.national_id.as_ref(), current.national_id.as_ref()),
            passport_number: pick(self.passport_number.as_ref(), current.passport_number.as_ref()),
            passport_photo_ref: pick(self.passport_photo_ref.as_ref(), current.passport_photo_ref.as_ref()),
            medical_notes: pick(self.medical_notes.as_ref(), current.medical_notes.as_ref()),
        };
        if merged.national_id.is_none() && merged.passport_number.is_none() {
            return Err(DomainError::MissingIdentity);
        }
        Ok(merged)
    }

    /// Returns whether the patch changes nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn pick<T: Clone>(change: Option<&Option<T>>, current: Option<&T>) -> Option<T> {
    change.map_or_else(|| current.cloned(), Clone::clone)
}

/// Validates an update payload into a field diff.
///
/// # Errors
///
/// Returns an error if any supplied field fails its format or length rule,
/// or if `full_name` or `gender` is supplied empty.
pub fn validate_pilgrim_patch(patch: &PilgrimPatch) -> Result<PilgrimChanges, DomainError> {
    Ok(PilgrimChanges {
        full_name: patch.full_name.as_deref().map(parse_full_name).transpose()?,
        gender: patch
            .gender
            .as_deref()
            .map(|g| Gender::from_str(g.trim()))
            .transpose()?,
        birth_date: clearable(patch.birth_date.as_deref(), |v| parse_date("birth_date", v))?,
        phone: clearable(patch.phone.as_deref(), |v| {
            check_length("phone", v, PHONE_MAX)
        })?,
        email: clearable(patch.email.as_deref(), parse_email)?,
        address: clearable(patch.address.as_deref(), |v| {
            check_length("address", v, ADDRESS_MAX)
        })?,
        national_id: clearable(patch.national_id.as_deref(), NationalId::parse)?,
        passport_number: clearable(patch.passport_number.as_deref(), PassportNumber::parse)?,
        passport_photo_ref: clearable(patch.passport_photo_ref.as_deref(), |v| {
            check_length("passport_photo_ref", v, FILE_REF_MAX)
        })?,
        medical_notes: clearable(patch.medical_notes.as_deref(), |v| {
            check_length("medical_notes", v, MEDICAL_NOTES_MAX)
        })?,
        package_id: patch
            .package_id
            .map(|inner| inner.map(parse_package_id).transpose())
            .transpose()?,
    })
}

/// Raw payment payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentDraft {
    pub amount: Option<i64>,
    pub payment_date: Option<String>,
    pub method: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub receipt_ref: Option<String>,
}

/// A validated payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub amount: Money,
    pub payment_date: Date,
    pub method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub receipt_ref: Option<String>,
}

/// Validates a payment payload.
///
/// # Errors
///
/// Returns an error if the amount, date or method is missing or malformed,
/// or if a text field exceeds its length limit.
pub fn validate_payment(draft: &PaymentDraft) -> Result<PaymentDetails, DomainError> {
    let amount: i64 = draft.amount.ok_or(DomainError::MissingField("amount"))?;
    if amount < 0 {
        return Err(DomainError::InvalidField {
            field: "amount",
            reason: String::from("must not be negative"),
        });
    }
    let payment_date: &str =
        optional(draft.payment_date.as_deref()).ok_or(DomainError::MissingField("payment_date"))?;
    let method: &str =
        optional(draft.method.as_deref()).ok_or(DomainError::MissingField("method"))?;

    Ok(PaymentDetails {
        amount: Money::from_minor(amount),
        payment_date: parse_date("payment_date", payment_date)?,
        method: PaymentMethod::from_str(method)?,
        reference_number: bounded_text(
            "reference_number",
            draft.reference_number.as_deref(),
            REFERENCE_NUMBER_MAX,
        )?,
        notes: bounded_text("notes", draft.notes.as_deref(), PAYMENT_NOTES_MAX)?,
        receipt_ref: bounded_text("receipt_ref", draft.receipt_ref.as_deref(), FILE_REF_MAX)?,
    })
}

/// Raw package payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageDraft {
    pub code: Option<String>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub total_capacity: Option<i64>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
}

/// A validated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDetails {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub total_capacity: u32,
    pub travel_dates: DateRange,
}

/// Validates a package payload.
///
/// # Errors
///
/// Returns an error if a field is missing, the capacity is below one, the
/// price is negative, or the return date precedes the departure date.
pub fn validate_package(draft: &PackageDraft) -> Result<PackageDetails, DomainError> {
    let code: &str = optional(draft.code.as_deref()).ok_or(DomainError::MissingField("code"))?;
    let name: &str = optional(draft.name.as_deref()).ok_or(DomainError::MissingField("name"))?;
    let price: i64 = draft.price.ok_or(DomainError::MissingField("price"))?;
    let capacity: i64 = draft
        .total_capacity
        .ok_or(DomainError::MissingField("total_capacity"))?;
    let departure: &str = optional(draft.departure_date.as_deref())
        .ok_or(DomainError::MissingField("departure_date"))?;
    let return_date: &str = optional(draft.return_date.as_deref())
        .ok_or(DomainError::MissingField("return_date"))?;

    if price < 0 {
        return Err(DomainError::InvalidField {
            field: "price",
            reason: String::from("must not be negative"),
        });
    }
    let total_capacity: u32 = u32::try_from(capacity)
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| DomainError::InvalidField {
            field: "total_capacity",
            reason: String::from("must be at least 1"),
        })?;

    Ok(PackageDetails {
        code: check_length("code", code, PACKAGE_CODE_MAX)?,
        name: check_length("name", name, PACKAGE_NAME_MAX)?,
        price: Money::from_minor(price),
        total_capacity,
        travel_dates: DateRange::new(
            parse_date("departure_date", departure)?,
            parse_date("return_date", return_date)?,
        )?,
    })
}

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` naming `field` if the value is not a
/// valid calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        DomainError::InvalidField {
            field,
            reason: format!("'{value}' is not a YYYY-MM-DD date"),
        }
    })
}

/// Formats a date as ISO `YYYY-MM-DD`, the inverse of [`parse_date`].
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn clearable<T>(
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, DomainError>,
) -> Result<Option<Option<T>>, DomainError> {
    match value.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(v) => parse(v).map(|parsed| Some(Some(parsed))),
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<String, DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::InvalidField {
            field,
            reason: format!("must be at most {max} characters"),
        });
    }
    Ok(value.to_string())
}

fn bounded_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    optional(value).map(|v| check_length(field, v, max)).transpose()
}

fn parse_full_name(value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    let len: usize = trimmed.chars().count();
    if !(FULL_NAME_MIN..=FULL_NAME_MAX).contains(&len) {
        return Err(DomainError::InvalidField {
            field: "full_name",
            reason: format!("must be between {FULL_NAME_MIN} and {FULL_NAME_MAX} characters"),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_email(value: &str) -> Result<String, DomainError> {
    let email: String = check_length("email", value.trim(), EMAIL_MAX)?;
    let valid: bool = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.split('.').count() >= 2
            && domain.split('.').all(|part| !part.is_empty())
    });
    if !valid {
        return Err(DomainError::InvalidField {
            field: "email",
            reason: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(email)
}

fn parse_package_id(value: i64) -> Result<PackageId, DomainError> {
    if value <= 0 {
        return Err(DomainError::InvalidField {
            field: "package_id",
            reason: format!("{value} is not a valid package id"),
        });
    }
    Ok(PackageId::new(value))
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
