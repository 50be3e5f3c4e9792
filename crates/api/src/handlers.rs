// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! State-changing handlers build a [`Registrar`] over the caller's
//! persistence handle, so each call runs in its own store transaction and
//! emits its audit events through the supplied sink. Read-only handlers
//! query persistence directly.

use std::str::FromStr;

use jamaah_audit::{Actor, AuditSink};
use jamaah_core::{BulkOutcome, PilgrimUpdate, Registrar};
use jamaah_domain::{
    DomainError, PackageDraft, PackageId, PaymentDraft, PaymentId, PilgrimDraft, PilgrimId,
    PilgrimPatch, PilgrimStatus,
};
use jamaah_persistence::{ActivityFilter, Persistence, PilgrimFilter};
use tracing::debug;

use crate::auth::AuthenticatedActor;
use crate::error::{ApiError, BulkRequestError, translate_core_error, translate_domain_error};
use crate::request_response::{
    ActivityLogInfo, BulkItemErrorInfo, BulkResponse, BulkUpdatePilgrimsRequest,
    BulkVerifyPaymentsRequest, ChangeStatusRequest, DeletePaymentResponse, ListActivityQuery,
    ListActivityResponse, ListPackagesResponse, ListPaymentsResponse, ListPilgrimsQuery,
    ListPilgrimsResponse, ListRegistrationsResponse, MessageResponse, OccupancyResponse,
    OverlapCheckResponse, PackageInfo, PackageResponse, PaymentInfo, PaymentResponse,
    PaymentSummaryInfo, PilgrimInfo, PilgrimResponse, RegisterPackageRequest,
    RegisterPilgrimResponse, RegistrationChangeResponse, RegistrationInfo,
};

/// Largest batch accepted by the bulk endpoints.
pub const MAX_BULK_ITEMS: usize = 200;

/// Largest page of activity log entries returned at once.
pub const MAX_ACTIVITY_LIMIT: i64 = 1000;

fn internal(context: &str, err: &impl std::fmt::Display) -> ApiError {
    ApiError::Internal {
        message: format!("{context}: {err}"),
    }
}

/// Rejects batches larger than [`MAX_BULK_ITEMS`].
///
/// Repeated ids are allowed; each occurrence runs as its own item.
///
/// # Errors
///
/// Returns `BulkRequestError::TooManyItems` for an oversized batch.
pub const fn validate_batch(ids: &[i64]) -> Result<(), BulkRequestError> {
    if ids.len() > MAX_BULK_ITEMS {
        return Err(BulkRequestError::TooManyItems {
            count: ids.len(),
            max: MAX_BULK_ITEMS,
        });
    }
    Ok(())
}

fn into_bulk_response<'a, T, R>(
    outcome: &'a BulkOutcome<T>,
    convert: impl Fn(&'a T) -> R,
) -> BulkResponse<R> {
    BulkResponse {
        results: outcome.results.iter().map(convert).collect(),
        errors: outcome.errors.iter().map(BulkItemErrorInfo::from).collect(),
    }
}

fn load_live_pilgrim(
    persistence: &mut Persistence,
    pilgrim_id: PilgrimId,
) -> Result<PilgrimInfo, ApiError> {
    let pilgrim = persistence
        .get_pilgrim(pilgrim_id)
        .map_err(|e| internal("Failed to load pilgrim", &e))?
        .filter(|p| !p.deleted)
        .ok_or_else(|| translate_domain_error(DomainError::PilgrimNotFound(pilgrim_id)))?;
    Ok(PilgrimInfo::from(&pilgrim))
}

// ============================================================================
// Pilgrims
// ============================================================================

/// Registers a new pilgrim.
///
/// A draft carrying `package_ids` takes the multi-package flow; otherwise
/// the pilgrim is created with at most one directly assigned package.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `audit` - Where audit events are recorded
/// * `actor` - The staff member performing the registration
/// * `draft` - The raw registration payload
///
/// # Errors
///
/// Returns an error if validation fails, the identity is taken, a package
/// is full or overlapping, or the store fails.
pub fn register_pilgrim(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    draft: &PilgrimDraft,
) -> Result<RegisterPilgrimResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(persistence, audit);

    if draft.package_ids.is_some() {
        let registered = registrar
            .register_pilgrim_with_packages(&audit_actor, draft)
            .map_err(translate_core_error)?;
        let registration_ids: Vec<i64> = registered
            .registrations
            .iter()
            .map(|id| id.value())
            .collect();
        return Ok(RegisterPilgrimResponse {
            message: format!(
                "Registered pilgrim '{}' on {} package(s)",
                registered.pilgrim.profile.full_name,
                registration_ids.len()
            ),
            pilgrim: PilgrimInfo::from(&registered.pilgrim),
            registration_ids,
        });
    }

    let pilgrim = registrar
        .register_pilgrim(&audit_actor, draft)
        .map_err(translate_core_error)?;
    Ok(RegisterPilgrimResponse {
        message: format!("Registered pilgrim '{}'", pilgrim.profile.full_name),
        pilgrim: PilgrimInfo::from(&pilgrim),
        registration_ids: Vec::new(),
    })
}

/// Retrieves a live pilgrim.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the pilgrim does not exist or was deleted.
pub fn get_pilgrim(
    persistence: &mut Persistence,
    pilgrim_id: i64,
) -> Result<PilgrimInfo, ApiError> {
    load_live_pilgrim(persistence, PilgrimId::new(pilgrim_id))
}

/// Lists pilgrims matching the query.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status, or `Internal` if the
/// query fails.
pub fn list_pilgrims(
    persistence: &mut Persistence,
    query: &ListPilgrimsQuery,
) -> Result<ListPilgrimsResponse, ApiError> {
    let status: Option<PilgrimStatus> = query
        .status
        .as_deref()
        .map(PilgrimStatus::from_str)
        .transpose()
        .map_err(translate_domain_error)?;
    let filter: PilgrimFilter = PilgrimFilter {
        status,
        package_id: query.package_id.map(PackageId::new),
        include_deleted: query.include_deleted,
    };
    let pilgrims = persistence
        .list_pilgrims(&filter)
        .map_err(|e| internal("Failed to list pilgrims", &e))?;
    Ok(ListPilgrimsResponse {
        pilgrims: pilgrims.iter().map(PilgrimInfo::from).collect(),
    })
}

/// Applies a partial update to a pilgrim.
///
/// # Errors
///
/// Returns an error if the pilgrim is missing, a field is invalid, a
/// changed identity collides, or a package change is refused.
pub fn update_pilgrim(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
    patch: &PilgrimPatch,
) -> Result<PilgrimResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let pilgrim = Registrar::new(persistence, audit)
        .update_pilgrim(&audit_actor, PilgrimId::new(pilgrim_id), patch)
        .map_err(translate_core_error)?;
    Ok(PilgrimResponse {
        message: format!("Updated pilgrim {pilgrim_id}"),
        pilgrim: PilgrimInfo::from(&pilgrim),
    })
}

/// Soft-deletes a pilgrim and releases every seat it held.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the pilgrim does not exist or was already
/// deleted.
pub fn delete_pilgrim(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
) -> Result<MessageResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    Registrar::new(persistence, audit)
        .delete_pilgrim(&audit_actor, PilgrimId::new(pilgrim_id))
        .map_err(translate_core_error)?;
    Ok(MessageResponse {
        message: format!("Deleted pilgrim {pilgrim_id}"),
    })
}

/// Moves a pilgrim to another lifecycle status.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status, `InvalidTransition` for a
/// transition the lifecycle forbids, or `CapacityExceeded` when an
/// un-cancel finds the package full.
pub fn change_status(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
    request: &ChangeStatusRequest,
) -> Result<PilgrimResponse, ApiError> {
    let status: PilgrimStatus =
        PilgrimStatus::from_str(&request.status).map_err(translate_domain_error)?;
    let audit_actor: Actor = actor.to_audit_actor();
    let pilgrim = Registrar::new(persistence, audit)
        .change_status(
            &audit_actor,
            PilgrimId::new(pilgrim_id),
            status,
            request.notes.as_deref(),
        )
        .map_err(translate_core_error)?;
    Ok(PilgrimResponse {
        message: format!("Pilgrim {pilgrim_id} is now {status}"),
        pilgrim: PilgrimInfo::from(&pilgrim),
    })
}

/// Returns a cancelled pilgrim to the pending state.
///
/// # Errors
///
/// Returns `InvalidTransition` if the pilgrim is not cancelled, or a
/// capacity or identity error if its seat or identity is no longer free.
pub fn reactivate_pilgrim(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
) -> Result<PilgrimResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let pilgrim = Registrar::new(persistence, audit)
        .reactivate_pilgrim(&audit_actor, PilgrimId::new(pilgrim_id))
        .map_err(translate_core_error)?;
    Ok(PilgrimResponse {
        message: format!("Reactivated pilgrim {pilgrim_id}"),
        pilgrim: PilgrimInfo::from(&pilgrim),
    })
}

/// Updates several pilgrims, each in its own transaction.
///
/// # Errors
///
/// Returns `InvalidInput` if the batch is too large or repeats a pilgrim.
/// Per-item failures are reported in the response instead.
pub fn bulk_update_pilgrims(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    request: &BulkUpdatePilgrimsRequest,
) -> Result<BulkResponse<PilgrimInfo>, ApiError> {
    let ids: Vec<i64> = request.updates.iter().map(|u| u.pilgrim_id).collect();
    validate_batch(&ids)?;

    let updates: Vec<PilgrimUpdate> = request
        .updates
        .iter()
        .map(|u| PilgrimUpdate {
            pilgrim_id: PilgrimId::new(u.pilgrim_id),
            patch: u.patch.clone(),
        })
        .collect();
    let audit_actor: Actor = actor.to_audit_actor();
    let outcome = Registrar::new(persistence, audit).bulk_update_pilgrims(&audit_actor, &updates);
    Ok(into_bulk_response(&outcome, PilgrimInfo::from))
}

// ============================================================================
// Multi-package registrations
// ============================================================================

/// Reports whether a pilgrim could join a package without a date overlap.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the pilgrim or package does not exist.
pub fn check_overlap(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    pilgrim_id: i64,
    package_id: i64,
) -> Result<OverlapCheckResponse, ApiError> {
    let decision = Registrar::new(persistence, audit)
        .check_overlap(PilgrimId::new(pilgrim_id), PackageId::new(package_id))
        .map_err(translate_core_error)?;
    Ok(OverlapCheckResponse::from(&decision))
}

/// Adds a package to a pilgrim through the registration table.
///
/// # Errors
///
/// Returns `OverlapConflict` if the dates collide with another active
/// registration, `CapacityExceeded` if the package is full, or
/// `ResourceNotFound` if either side does not exist.
pub fn register_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
    request: RegisterPackageRequest,
) -> Result<RegistrationChangeResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let registration_id = Registrar::new(persistence, audit)
        .register_package(
            &audit_actor,
            PilgrimId::new(pilgrim_id),
            PackageId::new(request.package_id),
        )
        .map_err(translate_core_error)?;
    Ok(RegistrationChangeResponse {
        registration_id: registration_id.value(),
        pilgrim_id,
        package_id: request.package_id,
        message: format!(
            "Registered pilgrim {pilgrim_id} on package {}",
            request.package_id
        ),
    })
}

/// Cancels a pilgrim's active registration on a package.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no active registration exists.
pub fn unregister_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
    package_id: i64,
) -> Result<RegistrationChangeResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let registration_id = Registrar::new(persistence, audit)
        .unregister_package(
            &audit_actor,
            PilgrimId::new(pilgrim_id),
            PackageId::new(package_id),
        )
        .map_err(translate_core_error)?;
    Ok(RegistrationChangeResponse {
        registration_id: registration_id.value(),
        pilgrim_id,
        package_id,
        message: format!("Cancelled registration of pilgrim {pilgrim_id} on package {package_id}"),
    })
}

/// Lists a pilgrim's registrations, cancelled ones included.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the pilgrim does not exist or was deleted.
pub fn list_registrations(
    persistence: &mut Persistence,
    pilgrim_id: i64,
) -> Result<ListRegistrationsResponse, ApiError> {
    let id: PilgrimId = PilgrimId::new(pilgrim_id);
    load_live_pilgrim(persistence, id)?;
    let registrations = persistence
        .list_registrations(id)
        .map_err(|e| internal("Failed to list registrations", &e))?;
    Ok(ListRegistrationsResponse {
        pilgrim_id,
        registrations: registrations.iter().map(RegistrationInfo::from).collect(),
    })
}

/// Reports a package's occupancy counted from active registrations.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the package does not exist.
pub fn registration_occupancy(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    package_id: i64,
) -> Result<OccupancyResponse, ApiError> {
    let occupancy = Registrar::new(persistence, audit)
        .registration_occupancy(PackageId::new(package_id))
        .map_err(translate_core_error)?;
    Ok(OccupancyResponse::from(&occupancy))
}

// ============================================================================
// Payments
// ============================================================================

/// Records a payment and recalculates the pilgrim's aggregates.
///
/// # Errors
///
/// Returns an error if the payment is invalid or the pilgrim is missing.
pub fn record_payment(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    pilgrim_id: i64,
    draft: &PaymentDraft,
) -> Result<PaymentResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let recorded = Registrar::new(persistence, audit)
        .record_payment(&audit_actor, PilgrimId::new(pilgrim_id), draft)
        .map_err(translate_core_error)?;
    Ok(PaymentResponse {
        message: format!(
            "Recorded payment of {} for pilgrim {pilgrim_id}",
            recorded.payment.amount
        ),
        payment: PaymentInfo::from(&recorded.payment),
        summary: PaymentSummaryInfo::from(&recorded.summary),
    })
}

/// Edits a payment and recalculates the owning pilgrim's aggregates.
///
/// # Errors
///
/// Returns an error if the payment is invalid or does not exist.
pub fn update_payment(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    payment_id: i64,
    draft: &PaymentDraft,
) -> Result<PaymentResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let recorded = Registrar::new(persistence, audit)
        .update_payment(&audit_actor, PaymentId::new(payment_id), draft)
        .map_err(translate_core_error)?;
    Ok(PaymentResponse {
        message: format!("Updated payment {payment_id}"),
        payment: PaymentInfo::from(&recorded.payment),
        summary: PaymentSummaryInfo::from(&recorded.summary),
    })
}

/// Deletes a payment and recalculates the owning pilgrim's aggregates.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the payment does not exist.
pub fn delete_payment(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    payment_id: i64,
) -> Result<DeletePaymentResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let summary = Registrar::new(persistence, audit)
        .delete_payment(&audit_actor, PaymentId::new(payment_id))
        .map_err(translate_core_error)?;
    Ok(DeletePaymentResponse {
        payment_id,
        summary: PaymentSummaryInfo::from(&summary),
        message: format!("Deleted payment {payment_id}"),
    })
}

/// Marks a payment as verified by the acting staff member.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the payment does not exist.
pub fn verify_payment(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    payment_id: i64,
) -> Result<PaymentInfo, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let payment = Registrar::new(persistence, audit)
        .verify_payment(&audit_actor, PaymentId::new(payment_id))
        .map_err(translate_core_error)?;
    Ok(PaymentInfo::from(&payment))
}

/// Verifies several payments, each in its own transaction.
///
/// # Errors
///
/// Returns `InvalidInput` if the batch is too large or repeats a payment.
pub fn bulk_verify_payments(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    request: &BulkVerifyPaymentsRequest,
) -> Result<BulkResponse<PaymentInfo>, ApiError> {
    validate_batch(&request.payment_ids)?;
    let payment_ids: Vec<PaymentId> = request
        .payment_ids
        .iter()
        .copied()
        .map(PaymentId::new)
        .collect();
    let audit_actor: Actor = actor.to_audit_actor();
    let outcome =
        Registrar::new(persistence, audit).bulk_verify_payments(&audit_actor, &payment_ids);
    Ok(into_bulk_response(&outcome, PaymentInfo::from))
}

/// Lists a pilgrim's payments by payment date.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the pilgrim does not exist or was deleted.
pub fn list_payments(
    persistence: &mut Persistence,
    pilgrim_id: i64,
) -> Result<ListPaymentsResponse, ApiError> {
    let id: PilgrimId = PilgrimId::new(pilgrim_id);
    load_live_pilgrim(persistence, id)?;
    let payments = persistence
        .list_payments(id)
        .map_err(|e| internal("Failed to list payments", &e))?;
    Ok(ListPaymentsResponse {
        pilgrim_id,
        payments: payments.iter().map(PaymentInfo::from).collect(),
    })
}

// ============================================================================
// Packages
// ============================================================================

/// Creates a package.
///
/// # Errors
///
/// Returns `InvalidInput` if a field is invalid or the code is taken.
pub fn create_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    draft: &PackageDraft,
) -> Result<PackageResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let package = Registrar::new(persistence, audit)
        .create_package(&audit_actor, draft)
        .map_err(translate_core_error)?;
    Ok(PackageResponse {
        message: format!("Created package '{}'", package.code),
        package: PackageInfo::from(&package),
    })
}

/// Updates a package.
///
/// # Errors
///
/// Returns `InvalidInput` if a field is invalid or the capacity would drop
/// below the seats already taken.
pub fn update_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    package_id: i64,
    draft: &PackageDraft,
) -> Result<PackageResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let package = Registrar::new(persistence, audit)
        .update_package(&audit_actor, PackageId::new(package_id), draft)
        .map_err(translate_core_error)?;
    Ok(PackageResponse {
        message: format!("Updated package '{}'", package.code),
        package: PackageInfo::from(&package),
    })
}

/// Deletes a package nobody is attached to.
///
/// # Errors
///
/// Returns `PackageInUse` if a live pilgrim is still assigned to it.
pub fn delete_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    package_id: i64,
) -> Result<MessageResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    Registrar::new(persistence, audit)
        .delete_package(&audit_actor, PackageId::new(package_id))
        .map_err(translate_core_error)?;
    Ok(MessageResponse {
        message: format!("Deleted package {package_id}"),
    })
}

/// Retrieves a package.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the package does not exist.
pub fn get_package(
    persistence: &mut Persistence,
    package_id: i64,
) -> Result<PackageInfo, ApiError> {
    let id: PackageId = PackageId::new(package_id);
    let package = persistence
        .get_package(id)
        .map_err(|e| internal("Failed to load package", &e))?
        .ok_or_else(|| translate_domain_error(DomainError::PackageNotFound(id)))?;
    Ok(PackageInfo::from(&package))
}

/// Lists every package by departure date.
///
/// # Errors
///
/// Returns `Internal` if the query fails.
pub fn list_packages(persistence: &mut Persistence) -> Result<ListPackagesResponse, ApiError> {
    let packages = persistence
        .list_packages()
        .map_err(|e| internal("Failed to list packages", &e))?;
    Ok(ListPackagesResponse {
        packages: packages.iter().map(PackageInfo::from).collect(),
    })
}

/// Recounts a package's occupied seats from the live pilgrims on it.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the package does not exist.
pub fn recompute_capacity(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    actor: &AuthenticatedActor,
    package_id: i64,
) -> Result<PackageResponse, ApiError> {
    let audit_actor: Actor = actor.to_audit_actor();
    let package = Registrar::new(persistence, audit)
        .recompute_capacity(&audit_actor, PackageId::new(package_id))
        .map_err(translate_core_error)?;
    Ok(PackageResponse {
        message: format!(
            "Package '{}' has {} of {} seats taken",
            package.code, package.occupied_seats, package.total_capacity
        ),
        package: PackageInfo::from(&package),
    })
}

// ============================================================================
// Activity log
// ============================================================================

/// Lists activity log entries, newest first.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-positive or oversized limit, or
/// `Internal` if the query fails.
pub fn list_activity(
    persistence: &mut Persistence,
    query: &ListActivityQuery,
) -> Result<ListActivityResponse, ApiError> {
    if query
        .limit
        .is_some_and(|limit| !(1..=MAX_ACTIVITY_LIMIT).contains(&limit))
    {
        return Err(ApiError::InvalidInput {
            field: String::from("limit"),
            message: format!("Limit must be between 1 and {MAX_ACTIVITY_LIMIT}"),
        });
    }
    let filter: ActivityFilter = ActivityFilter {
        entity_type: query.entity_type.clone(),
        entity_id: query.entity_id,
        actor_id: query.actor_id.clone(),
        limit: Some(query.limit.unwrap_or(MAX_ACTIVITY_LIMIT)),
    };
    let entries = persistence
        .list_activity(&filter)
        .map_err(|e| internal("Failed to list activity", &e))?;
    debug!(count = entries.len(), "Listed activity log entries");
    Ok(ListActivityResponse {
        entries: entries.into_iter().map(ActivityLogInfo::from).collect(),
    })
}
