// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Create and edit payloads reuse the raw drafts of `jamaah-domain`
//! (`PilgrimDraft`, `PilgrimPatch`, `PackageDraft`, `PaymentDraft`), which
//! are validated by the engine. Everything returned to a client is one of
//! the flat types below, with dates as `YYYY-MM-DD` strings and money in
//! minor units.

use jamaah_core::{BulkItemError, PaymentSummary, RegistrationOccupancy};
use jamaah_domain::{
    OverlapDecision, Package, Payment, Pilgrim, PilgrimPatch, Registration, format_date,
};
use jamaah_persistence::ActivityLogEntry;
use serde::{Deserialize, Serialize};

/// A pilgrim as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilgrimInfo {
    pub pilgrim_id: i64,
    pub full_name: String,
    pub gender: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub passport_number: Option<String>,
    pub passport_photo_ref: Option<String>,
    pub medical_notes: Option<String>,
    pub status: String,
    pub status_notes: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
    pub package_id: Option<i64>,
    pub total_paid: i64,
    pub remaining_balance: i64,
    pub payment_status: String,
    pub created_by: String,
}

impl From<&Pilgrim> for PilgrimInfo {
    fn from(pilgrim: &Pilgrim) -> Self {
        let profile = &pilgrim.profile;
        Self {
            pilgrim_id: pilgrim.pilgrim_id.value(),
            full_name: profile.full_name.clone(),
            gender: profile.gender.as_str().to_string(),
            birth_date: profile.birth_date.map(format_date),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            address: profile.address.clone(),
            national_id: profile.national_id.as_ref().map(|v| v.as_str().to_string()),
            passport_number: profile
                .passport_number
                .as_ref()
                .map(|v| v.as_str().to_string()),
            passport_photo_ref: profile.passport_photo_ref.clone(),
            medical_notes: profile.medical_notes.clone(),
            status: pilgrim.status.as_str().to_string(),
            status_notes: pilgrim.status_notes.clone(),
            is_deleted: pilgrim.deleted,
            deleted_at: pilgrim.deleted_at.clone(),
            package_id: pilgrim.package_id.map(|id| id.value()),
            total_paid: pilgrim.total_paid.minor(),
            remaining_balance: pilgrim.remaining_balance.minor(),
            payment_status: pilgrim.payment_status.as_str().to_string(),
            created_by: pilgrim.created_by.clone(),
        }
    }
}

/// A package as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub package_id: i64,
    pub code: String,
    pub name: String,
    pub price: i64,
    pub total_capacity: u32,
    pub occupied_seats: u32,
    pub available_seats: u32,
    pub departure_date: String,
    pub return_date: String,
}

impl From<&Package> for PackageInfo {
    fn from(package: &Package) -> Self {
        Self {
            package_id: package.package_id.value(),
            code: package.code.clone(),
            name: package.name.clone(),
            price: package.price.minor(),
            total_capacity: package.total_capacity,
            occupied_seats: package.occupied_seats,
            available_seats: package.available_seats(),
            departure_date: format_date(package.travel_dates.start()),
            return_date: format_date(package.travel_dates.end()),
        }
    }
}

/// A multi-package registration as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    pub registration_id: i64,
    pub pilgrim_id: i64,
    pub package_id: i64,
    pub status: String,
    pub created_by: String,
    pub created_at: String,
}

impl From<&Registration> for RegistrationInfo {
    fn from(registration: &Registration) -> Self {
        Self {
            registration_id: registration.registration_id.value(),
            pilgrim_id: registration.pilgrim_id.value(),
            package_id: registration.package_id.value(),
            status: registration.status.as_str().to_string(),
            created_by: registration.created_by.clone(),
            created_at: registration.created_at.clone(),
        }
    }
}

/// A payment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_id: i64,
    pub pilgrim_id: i64,
    pub amount: i64,
    pub payment_date: String,
    pub method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub receipt_ref: Option<String>,
    pub created_by: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<String>,
}

impl From<&Payment> for PaymentInfo {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.payment_id.value(),
            pilgrim_id: payment.pilgrim_id.value(),
            amount: payment.amount.minor(),
            payment_date: format_date(payment.payment_date),
            method: payment.method.as_str().to_string(),
            reference_number: payment.reference_number.clone(),
            notes: payment.notes.clone(),
            receipt_ref: payment.receipt_ref.clone(),
            created_by: payment.created_by.clone(),
            verified_by: payment.verified_by.clone(),
            verified_at: payment.verified_at.clone(),
        }
    }
}

/// A pilgrim's payment aggregates after a ledger write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummaryInfo {
    pub total_paid: i64,
    pub remaining_balance: i64,
    pub payment_status: String,
}

impl From<&PaymentSummary> for PaymentSummaryInfo {
    fn from(summary: &PaymentSummary) -> Self {
        Self {
            total_paid: summary.total_paid().minor(),
            remaining_balance: summary.remaining_balance().minor(),
            payment_status: summary.status().as_str().to_string(),
        }
    }
}

/// API response for a pilgrim registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPilgrimResponse {
    /// The created pilgrim.
    pub pilgrim: PilgrimInfo,
    /// Registrations created by the multi-package flow, in request order.
    pub registration_ids: Vec<i64>,
    /// A success message.
    pub message: String,
}

/// API response carrying a single pilgrim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilgrimResponse {
    pub pilgrim: PilgrimInfo,
    pub message: String,
}

/// API response for pilgrim listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPilgrimsResponse {
    pub pilgrims: Vec<PilgrimInfo>,
}

/// Query parameters narrowing a pilgrim listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListPilgrimsQuery {
    /// Lifecycle status (`pending`, `active`, `cancelled`, `completed`).
    pub status: Option<String>,
    pub package_id: Option<i64>,
    #[serde(default)]
    pub include_deleted: bool,
}

/// API request to change a pilgrim's lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeStatusRequest {
    /// The target status.
    pub status: String,
    /// Free-text reason stored with the status.
    pub notes: Option<String>,
}

/// API request to add a package to a pilgrim (multi-package flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RegisterPackageRequest {
    pub package_id: i64,
}

/// API response for a registration change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationChangeResponse {
    pub registration_id: i64,
    pub pilgrim_id: i64,
    pub package_id: i64,
    pub message: String,
}

/// API response for a pilgrim's registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRegistrationsResponse {
    pub pilgrim_id: i64,
    pub registrations: Vec<RegistrationInfo>,
}

/// API response for an overlap pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapCheckResponse {
    pub allowed: bool,
    pub reason: Option<String>,
    pub conflicting_registration_id: Option<i64>,
    pub conflicting_package_id: Option<i64>,
}

impl From<&OverlapDecision> for OverlapCheckResponse {
    fn from(decision: &OverlapDecision) -> Self {
        Self {
            allowed: decision.allowed,
            reason: decision.reason.clone(),
            conflicting_registration_id: decision.conflicting_registration.map(|id| id.value()),
            conflicting_package_id: decision.conflicting_package.map(|id| id.value()),
        }
    }
}

/// API response for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResponse {
    pub package: PackageInfo,
    pub message: String,
}

/// API response for package listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPackagesResponse {
    pub packages: Vec<PackageInfo>,
}

/// API response for multi-package occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyResponse {
    pub package_id: i64,
    pub total_capacity: u32,
    pub active_registrations: u32,
    pub available: u32,
}

impl From<&RegistrationOccupancy> for OccupancyResponse {
    fn from(occupancy: &RegistrationOccupancy) -> Self {
        Self {
            package_id: occupancy.package_id.value(),
            total_capacity: occupancy.total_capacity,
            active_registrations: occupancy.active_registrations,
            available: occupancy.available,
        }
    }
}

/// API response for a payment write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResponse {
    pub payment: PaymentInfo,
    pub summary: PaymentSummaryInfo,
    pub message: String,
}

/// API response for a payment deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePaymentResponse {
    pub payment_id: i64,
    pub summary: PaymentSummaryInfo,
    pub message: String,
}

/// API response for a payment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPaymentsResponse {
    pub pilgrim_id: i64,
    pub payments: Vec<PaymentInfo>,
}

/// API request to verify several payments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BulkVerifyPaymentsRequest {
    pub payment_ids: Vec<i64>,
}

/// One entry of a bulk pilgrim update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PilgrimUpdateRequest {
    pub pilgrim_id: i64,
    #[serde(default)]
    pub patch: PilgrimPatch,
}

/// API request to update several pilgrims, each item carrying its own patch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BulkUpdatePilgrimsRequest {
    pub updates: Vec<PilgrimUpdateRequest>,
}

/// A failed item of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemErrorInfo {
    pub item_id: i64,
    pub error_kind: String,
    pub message: String,
}

impl From<&BulkItemError> for BulkItemErrorInfo {
    fn from(err: &BulkItemError) -> Self {
        Self {
            item_id: err.item_id,
            error_kind: err.kind.as_str().to_string(),
            message: err.message.clone(),
        }
    }
}

/// API response for a bulk operation: every item is in exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkResponse<T> {
    pub results: Vec<T>,
    pub errors: Vec<BulkItemErrorInfo>,
}

/// An activity log entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogInfo {
    pub log_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: String,
}

impl From<ActivityLogEntry> for ActivityLogInfo {
    fn from(entry: ActivityLogEntry) -> Self {
        Self {
            log_id: entry.log_id,
            actor_id: entry.actor_id,
            actor_type: entry.actor_type,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            details: entry.details,
            created_at: entry.created_at,
        }
    }
}

/// Query parameters narrowing the activity log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListActivityQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub actor_id: Option<String>,
    pub limit: Option<i64>,
}

/// API response for the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListActivityResponse {
    pub entries: Vec<ActivityLogInfo>,
}

/// API response for operations that return nothing but a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
