// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The registration orchestrator.
//!
//! Every public operation of [`Registrar`] is one transaction: it either
//! commits in full or leaves the store untouched. Bulk operations run each
//! item in its own transaction and report failures per item. The audit sink
//! is informed only after a commit, and its failures are logged, never
//! propagated.

use crate::bulk::{BulkOutcome, PilgrimUpdate};
use crate::capacity::{self, RegistrationOccupancy};
use crate::error::{CoreError, StoreError};
use crate::identity;
use crate::overlap;
use crate::payments::{self, PaymentSummary};
use crate::store::{NewPilgrim, Store, Transaction};
use jamaah_audit::{Action, Actor, AuditEvent, AuditSink, EntityType};
use jamaah_domain::{
    DomainError, OverlapDecision, Package, PackageDetails, PackageDraft, PackageId, Payment,
    PaymentDetails, PaymentDraft, PaymentId, Pilgrim, PilgrimChanges, PilgrimDraft, PilgrimId,
    PilgrimPatch, PilgrimProfile, PilgrimStatus, RegistrationFlow, RegistrationId, ValidatedPilgrim,
    validate_package, validate_payment, validate_pilgrim, validate_pilgrim_patch,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

/// A pilgrim created through the multi-package flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPilgrim {
    /// The new pilgrim.
    pub pilgrim: Pilgrim,
    /// Registrations created, in request order.
    pub registrations: Vec<RegistrationId>,
}

/// A payment together with the aggregates it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPayment {
    /// The payment as stored.
    pub payment: Payment,
    /// The pilgrim's recalculated aggregates.
    pub summary: PaymentSummary,
}

/// Runs engine operations against a store.
pub struct Registrar<'a, S: Store> {
    store: &'a mut S,
    audit: &'a dyn AuditSink,
}

impl<'a, S: Store> Registrar<'a, S> {
    /// Creates a registrar.
    ///
    /// # Arguments
    ///
    /// * `store` - The store to run transactions against
    /// * `audit` - Where committed changes are reported
    pub const fn new(store: &'a mut S, audit: &'a dyn AuditSink) -> Self {
        Self { store, audit }
    }

    fn notify(
        &self,
        actor: &Actor,
        entity_type: EntityType,
        entity_id: i64,
        action: &str,
        details: Option<String>,
    ) {
        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            entity_type,
            entity_id,
            Action::new(action.to_string(), details),
        );
        if let Err(err) = self.audit.record(&event) {
            warn!(
                entity_type = entity_type.as_str(),
                entity_id,
                action,
                error = %err,
                "Failed to record audit event"
            );
        }
    }

    /// Registers a pilgrim through the single-package flow.
    ///
    /// Validates with the national-ID-required schema, checks identity
    /// uniqueness, inserts the pilgrim, takes a seat on the supplied package
    /// and initialises the payment aggregates.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `DuplicateIdentity`, `ReactivationCandidate`,
    /// `NotFound`, `CapacityExceeded`, or a store error. Nothing is written
    /// on failure.
    pub fn register_pilgrim(
        &mut self,
        actor: &Actor,
        draft: &PilgrimDraft,
    ) -> Result<Pilgrim, CoreError> {
        let validated: ValidatedPilgrim = validate_pilgrim(RegistrationFlow::SinglePackage, draft)?;
        let now: String = timestamp()?;

        let pilgrim: Pilgrim = self.store.transaction(|tx| {
            identity::ensure_available(
                tx,
                validated.profile.national_id.as_ref(),
                validated.profile.passport_number.as_ref(),
                None,
            )?;
            if let Some(package_id) = validated.package_id {
                require_package(tx, package_id)?;
            }
            let pilgrim_id: PilgrimId = tx.insert_pilgrim(&NewPilgrim {
                profile: &validated.profile,
                package_id: validated.package_id,
                status: PilgrimStatus::Pending,
                created_by: &actor.id,
                created_at: &now,
            })?;
            if let Some(package_id) = validated.package_id {
                capacity::attach(tx, pilgrim_id, package_id)?;
            }
            payments::recalculate(tx, pilgrim_id)?;
            live_pilgrim(tx, pilgrim_id)
        })?;

        info!(
            pilgrim_id = pilgrim.pilgrim_id.value(),
            package_id = pilgrim.package_id.map(|id| id.value()),
            actor = %actor.id,
            "Registered pilgrim"
        );
        self.notify(
            actor,
            EntityType::Pilgrim,
            pilgrim.pilgrim_id.value(),
            "RegisterPilgrim",
            pilgrim.package_id.map(|id| format!("package_id={id}")),
        );
        Ok(pilgrim)
    }

    /// Registers a pilgrim through the multi-package flow.
    ///
    /// Each requested package is overlap-checked and registered in request
    /// order. The first conflict aborts the whole registration, pilgrim
    /// included. No seat counters are touched.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `DuplicateIdentity`, `ReactivationCandidate`,
    /// `NotFound`, `OverlapConflict`, or a store error.
    pub fn register_pilgrim_with_packages(
        &mut self,
        actor: &Actor,
        draft: &PilgrimDraft,
    ) -> Result<RegisteredPilgrim, CoreError> {
        let validated: ValidatedPilgrim = validate_pilgrim(RegistrationFlow::MultiPackage, draft)?;
        let now: String = timestamp()?;

        let registered: RegisteredPilgrim = self.store.transaction(|tx| {
            identity::ensure_available(
                tx,
                validated.profile.national_id.as_ref(),
                validated.profile.passport_number.as_ref(),
                None,
            )?;
            let pilgrim_id: PilgrimId = tx.insert_pilgrim(&NewPilgrim {
                profile: &validated.profile,
                package_id: None,
                status: PilgrimStatus::Pending,
                created_by: &actor.id,
                created_at: &now,
            })?;
            let mut registrations: Vec<RegistrationId> =
                Vec::with_capacity(validated.package_ids.len());
            for package_id in &validated.package_ids {
                overlap::can_register(tx, pilgrim_id, *package_id)?.into_result(*package_id)?;
                registrations.push(tx.insert_registration(
                    pilgrim_id,
                    *package_id,
                    &actor.id,
                    &now,
                )?);
            }
            payments::recalculate(tx, pilgrim_id)?;
            Ok(RegisteredPilgrim {
                pilgrim: live_pilgrim(tx, pilgrim_id)?,
                registrations,
            })
        })?;

        info!(
            pilgrim_id = registered.pilgrim.pilgrim_id.value(),
            packages = registered.registrations.len(),
            actor = %actor.id,
            "Registered pilgrim with packages"
        );
        self.notify(
            actor,
            EntityType::Pilgrim,
            registered.pilgrim.pilgrim_id.value(),
            "RegisterPilgrimWithPackages",
            Some(format!("registrations={}", registered.registrations.len())),
        );
        Ok(registered)
    }

    /// Applies a field diff to a pilgrim.
    ///
    /// Identity is re-checked only for documents that actually change. A
    /// package change releases the old seat before taking the new one, and
    /// both counters are recomputed afterwards.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation`, `DuplicateIdentity`,
    /// `CapacityExceeded`, or a store error. Nothing is written on failure.
    pub fn update_pilgrim(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
        patch: &PilgrimPatch,
    ) -> Result<Pilgrim, CoreError> {
        let changes: PilgrimChanges = validate_pilgrim_patch(patch)?;
        let now: String = timestamp()?;

        let pilgrim: Pilgrim = self
            .store
            .transaction(|tx| apply_pilgrim_changes(tx, pilgrim_id, &changes, &now))?;

        info!(
            pilgrim_id = pilgrim_id.value(),
            package_id = pilgrim.package_id.map(|id| id.value()),
            actor = %actor.id,
            "Updated pilgrim"
        );
        self.notify(
            actor,
            EntityType::Pilgrim,
            pilgrim_id.value(),
            "UpdatePilgrim",
            None,
        );
        Ok(pilgrim)
    }

    /// Soft-deletes a pilgrim, releasing its seat and cancelling its
    /// registrations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a store error.
    pub fn delete_pilgrim(&mut self, actor: &Actor, pilgrim_id: PilgrimId) -> Result<(), CoreError> {
        let now: String = timestamp()?;

        self.store.transaction(|tx| {
            let current: Pilgrim = live_pilgrim(tx, pilgrim_id)?;
            if let Some(package_id) = current.attached_package() {
                capacity::detach(tx, pilgrim_id, package_id)?;
            }
            for trip in tx.active_bookings(pilgrim_id)? {
                tx.cancel_registration(trip.registration_id, &now)?;
            }
            tx.mark_pilgrim_deleted(pilgrim_id, &now)
        })?;

        info!(pilgrim_id = pilgrim_id.value(), actor = %actor.id, "Deleted pilgrim");
        self.notify(
            actor,
            EntityType::Pilgrim,
            pilgrim_id.value(),
            "DeletePilgrim",
            None,
        );
        Ok(())
    }

    /// Changes a pilgrim's lifecycle status.
    ///
    /// Cancelling releases the pilgrim's seat. Leaving `cancelled` is only
    /// possible through [`Self::reactivate_pilgrim`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTransition`, or a store error.
    pub fn change_status(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
        status: PilgrimStatus,
        notes: Option<&str>,
    ) -> Result<Pilgrim, CoreError> {
        let now: String = timestamp()?;

        let (previous, pilgrim): (PilgrimStatus, Pilgrim) = self.store.transaction(|tx| {
            let current: Pilgrim = live_pilgrim(tx, pilgrim_id)?;
            if !current.status.can_transition_to(status) {
                return Err(DomainError::InvalidStatusTransition {
                    from: current.status,
                    to: status,
                }
                .into());
            }
            if !status.is_live()
                && let Some(package_id) = current.attached_package()
            {
                capacity::detach(tx, pilgrim_id, package_id)?;
            }
            tx.set_pilgrim_status(pilgrim_id, status, notes, &now)?;
            Ok((current.status, live_pilgrim(tx, pilgrim_id)?))
        })?;

        info!(
            pilgrim_id = pilgrim_id.value(),
            from = previous.as_str(),
            to = status.as_str(),
            actor = %actor.id,
            "Changed pilgrim status"
        );
        self.notify(
            actor,
            EntityType::Pilgrim,
            pilgrim_id.value(),
            "ChangeStatus",
            Some(format!("{previous} -> {status}")),
        );
        Ok(pilgrim)
    }

    /// Brings a cancelled pilgrim back to `pending`.
    ///
    /// The pilgrim's identity documents must not have been taken by a live
    /// pilgrim meanwhile, and its assigned package must still have a seat.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTransition`, `DuplicateIdentity`,
    /// `CapacityExceeded`, or a store error.
    pub fn reactivate_pilgrim(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
    ) -> Result<Pilgrim, CoreError> {
        let now: String = timestamp()?;

        let pilgrim: Pilgrim = self.store.transaction(|tx| {
            let current: Pilgrim = live_pilgrim(tx, pilgrim_id)?;
            if current.status != PilgrimStatus::Cancelled {
                return Err(DomainError::InvalidStatusTransition {
                    from: current.status,
                    to: PilgrimStatus::Pending,
                }
                .into());
            }
            identity::ensure_not_taken(
                tx,
                current.profile.national_id.as_ref(),
                current.profile.passport_number.as_ref(),
                Some(pilgrim_id),
            )?;
            tx.set_pilgrim_status(pilgrim_id, PilgrimStatus::Pending, None, &now)?;
            if let Some(package_id) = current.package_id {
                capacity::attach(tx, pilgrim_id, package_id)?;
            }
            payments::recalculate(tx, pilgrim_id)?;
            live_pilgrim(tx, pilgrim_id)
        })?;

        info!(pilgrim_id = pilgrim_id.value(), actor = %actor.id, "Reactivated pilgrim");
        self.notify(
            actor,
            EntityType::Pilgrim,
            pilgrim_id.value(),
            "ReactivatePilgrim",
            None,
        );
        Ok(pilgrim)
    }

    /// Checks whether a pilgrim could be registered on a package.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a store error.
    pub fn check_overlap(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<OverlapDecision, CoreError> {
        self.store.transaction(|tx| {
            live_pilgrim(tx, pilgrim_id)?;
            overlap::can_register(tx, pilgrim_id, package_id)
        })
    }

    /// Registers a pilgrim on an additional package (multi-package flow).
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `OverlapConflict`, or a store error.
    pub fn register_package(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<RegistrationId, CoreError> {
        let now: String = timestamp()?;

        let registration_id: RegistrationId = self.store.transaction(|tx| {
            live_pilgrim(tx, pilgrim_id)?;
            overlap::can_register(tx, pilgrim_id, package_id)?.into_result(package_id)?;
            tx.insert_registration(pilgrim_id, package_id, &actor.id, &now)
        })?;

        info!(
            pilgrim_id = pilgrim_id.value(),
            package_id = package_id.value(),
            registration_id = registration_id.value(),
            actor = %actor.id,
            "Registered package"
        );
        self.notify(
            actor,
            EntityType::Registration,
            registration_id.value(),
            "RegisterPackage",
            Some(format!("pilgrim_id={pilgrim_id} package_id={package_id}")),
        );
        Ok(registration_id)
    }

    /// Cancels a pilgrim's active registration on a package.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no active registration exists, or a store error.
    pub fn unregister_package(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<RegistrationId, CoreError> {
        let now: String = timestamp()?;

        let registration_id: RegistrationId = self.store.transaction(|tx| {
            let registration_id: RegistrationId = tx
                .find_active_registration(pilgrim_id, package_id)?
                .ok_or(DomainError::RegistrationNotFound {
                    pilgrim_id,
                    package_id,
                })?;
            tx.cancel_registration(registration_id, &now)?;
            Ok(registration_id)
        })?;

        info!(
            pilgrim_id = pilgrim_id.value(),
            package_id = package_id.value(),
            registration_id = registration_id.value(),
            actor = %actor.id,
            "Unregistered package"
        );
        self.notify(
            actor,
            EntityType::Registration,
            registration_id.value(),
            "UnregisterPackage",
            Some(format!("pilgrim_id={pilgrim_id} package_id={package_id}")),
        );
        Ok(registration_id)
    }

    /// Reports how many active registrations a package holds.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a store error.
    pub fn registration_occupancy(
        &mut self,
        package_id: PackageId,
    ) -> Result<RegistrationOccupancy, CoreError> {
        self.store
            .transaction(|tx| capacity::registration_occupancy(tx, package_id))
    }

    /// Records a payment and recalculates the pilgrim's aggregates.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `NotFound`, or a store error.
    pub fn record_payment(
        &mut self,
        actor: &Actor,
        pilgrim_id: PilgrimId,
        draft: &PaymentDraft,
    ) -> Result<RecordedPayment, CoreError> {
        let details: PaymentDetails = validate_payment(draft)?;
        let now: String = timestamp()?;

        let recorded: RecordedPayment = self.store.transaction(|tx| {
            live_pilgrim(tx, pilgrim_id)?;
            let payment_id: PaymentId = tx.insert_payment(pilgrim_id, &details, &actor.id, &now)?;
            let summary: PaymentSummary = payments::recalculate(tx, pilgrim_id)?;
            Ok(RecordedPayment {
                payment: load_payment(tx, payment_id)?,
                summary,
            })
        })?;

        info!(
            payment_id = recorded.payment.payment_id.value(),
            pilgrim_id = pilgrim_id.value(),
            amount = details.amount.minor(),
            status = recorded.summary.status().as_str(),
            actor = %actor.id,
            "Recorded payment"
        );
        self.notify(
            actor,
            EntityType::Payment,
            recorded.payment.payment_id.value(),
            "RecordPayment",
            Some(format!("pilgrim_id={pilgrim_id} amount={}", details.amount)),
        );
        Ok(recorded)
    }

    /// Replaces a payment's details and recalculates the pilgrim's aggregates.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `NotFound`, or a store error.
    pub fn update_payment(
        &mut self,
        actor: &Actor,
        payment_id: PaymentId,
        draft: &PaymentDraft,
    ) -> Result<RecordedPayment, CoreError> {
        let details: PaymentDetails = validate_payment(draft)?;
        let now: String = timestamp()?;

        let recorded: RecordedPayment = self.store.transaction(|tx| {
            let existing: Payment = load_payment(tx, payment_id)?;
            tx.update_payment(payment_id, &details, &now)?;
            let summary: PaymentSummary = payments::recalculate(tx, existing.pilgrim_id)?;
            Ok(RecordedPayment {
                payment: load_payment(tx, payment_id)?,
                summary,
            })
        })?;

        info!(
            payment_id = payment_id.value(),
            amount = details.amount.minor(),
            actor = %actor.id,
            "Updated payment"
        );
        self.notify(
            actor,
            EntityType::Payment,
            payment_id.value(),
            "UpdatePayment",
            Some(format!("amount={}", details.amount)),
        );
        Ok(recorded)
    }

    /// Deletes a payment and recalculates the pilgrim's aggregates.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a store error.
    pub fn delete_payment(
        &mut self,
        actor: &Actor,
        payment_id: PaymentId,
    ) -> Result<PaymentSummary, CoreError> {
        let summary: PaymentSummary = self.store.transaction(|tx| {
            let existing: Payment = load_payment(tx, payment_id)?;
            tx.delete_payment(payment_id)?;
            payments::recalculate(tx, existing.pilgrim_id)
        })?;

        info!(payment_id = payment_id.value(), actor = %actor.id, "Deleted payment");
        self.notify(
            actor,
            EntityType::Payment,
            payment_id.value(),
            "DeletePayment",
            None,
        );
        Ok(summary)
    }

    /// Marks a payment as verified by the actor. Totals are not affected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a store error.
    pub fn verify_payment(
        &mut self,
        actor: &Actor,
        payment_id: PaymentId,
    ) -> Result<Payment, CoreError> {
        let now: String = timestamp()?;

        let payment: Payment = self.store.transaction(|tx| {
            load_payment(tx, payment_id)?;
            tx.mark_payment_verified(payment_id, &actor.id, &now)?;
            load_payment(tx, payment_id)
        })?;

        info!(payment_id = payment_id.value(), actor = %actor.id, "Verified payment");
        self.notify(
            actor,
            EntityType::Payment,
            payment_id.value(),
            "VerifyPayment",
            None,
        );
        Ok(payment)
    }

    /// Verifies each payment in its own transaction.
    ///
    /// Failures are collected per item and never stop the batch.
    pub fn bulk_verify_payments(
        &mut self,
        actor: &Actor,
        payment_ids: &[PaymentId],
    ) -> BulkOutcome<Payment> {
        let mut outcome: BulkOutcome<Payment> = BulkOutcome::new();
        for payment_id in payment_ids {
            let result: Result<Payment, CoreError> = self.verify_payment(actor, *payment_id);
            outcome.push(payment_id.value(), result);
        }
        info!(
            succeeded = outcome.results.len(),
            failed = outcome.errors.len(),
            actor = %actor.id,
            "Bulk payment verification finished"
        );
        outcome
    }

    /// Updates each pilgrim in its own transaction.
    ///
    /// Failures are collected per item and never stop the batch.
    pub fn bulk_update_pilgrims(
        &mut self,
        actor: &Actor,
        updates: &[PilgrimUpdate],
    ) -> BulkOutcome<Pilgrim> {
        let mut outcome: BulkOutcome<Pilgrim> = BulkOutcome::new();
        for update in updates {
            let result: Result<Pilgrim, CoreError> =
                self.update_pilgrim(actor, update.pilgrim_id, &update.patch);
            outcome.push(update.pilgrim_id.value(), result);
        }
        info!(
            succeeded = outcome.results.len(),
            failed = outcome.errors.len(),
            actor = %actor.id,
            "Bulk pilgrim update finished"
        );
        outcome
    }

    /// Creates a package with no seats taken.
    ///
    /// # Errors
    ///
    /// Returns `Validation` (including a duplicate code) or a store error.
    pub fn create_package(
        &mut self,
        actor: &Actor,
        draft: &PackageDraft,
    ) -> Result<Package, CoreError> {
        let details: PackageDetails = validate_package(draft)?;
        let now: String = timestamp()?;

        let package: Package = self.store.transaction(|tx| {
            if tx.find_package_by_code(&details.code)?.is_some() {
                return Err(DomainError::DuplicatePackageCode(details.code.clone()).into());
            }
            let package_id: PackageId = tx.insert_package(&details, &now)?;
            require_package(tx, package_id)
        })?;

        info!(
            package_id = package.package_id.value(),
            code = %package.code,
            capacity = package.total_capacity,
            actor = %actor.id,
            "Created package"
        );
        self.notify(
            actor,
            EntityType::Package,
            package.package_id.value(),
            "CreatePackage",
            Some(format!("code={}", package.code)),
        );
        Ok(package)
    }

    /// Replaces a package's details.
    ///
    /// Capacity may not drop below the seats already occupied. A price
    /// change recalculates the aggregates of every pilgrim on the package.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation`, or a store error.
    pub fn update_package(
        &mut self,
        actor: &Actor,
        package_id: PackageId,
        draft: &PackageDraft,
    ) -> Result<Package, CoreError> {
        let details: PackageDetails = validate_package(draft)?;
        let now: String = timestamp()?;

        let package: Package = self.store.transaction(|tx| {
            let current: Package = tx
                .lock_package(package_id)?
                .ok_or(DomainError::PackageNotFound(package_id))?;
            if let Some(holder) = tx.find_package_by_code(&details.code)?
                && holder != package_id
            {
                return Err(DomainError::DuplicatePackageCode(details.code.clone()).into());
            }
            if details.total_capacity < current.occupied_seats {
                return Err(DomainError::CapacityBelowOccupied {
                    package_id,
                    capacity: details.total_capacity,
                    occupied: current.occupied_seats,
                }
                .into());
            }
            tx.update_package(package_id, &details, &now)?;
            if details.price != current.price {
                for pilgrim_id in tx.pilgrims_on_package(package_id)? {
                    payments::recalculate(tx, pilgrim_id)?;
                }
            }
            require_package(tx, package_id)
        })?;

        info!(
            package_id = package_id.value(),
            capacity = package.total_capacity,
            actor = %actor.id,
            "Updated package"
        );
        self.notify(
            actor,
            EntityType::Package,
            package_id.value(),
            "UpdatePackage",
            None,
        );
        Ok(package)
    }

    /// Deletes a package no live record refers to.
    ///
    /// Cancelled pilgrims still count, since reactivation restores their
    /// seat, and so do cancelled registrations, which are kept as history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PackageInUse`, or a store error.
    pub fn delete_package(&mut self, actor: &Actor, package_id: PackageId) -> Result<(), CoreError> {
        self.store.transaction(|tx| {
            require_package(tx, package_id)?;
            let assigned_pilgrims: u32 = tx.count_assigned_pilgrims(package_id)?;
            let registrations: u32 = tx.count_registrations(package_id)?;
            if assigned_pilgrims > 0 || registrations > 0 {
                return Err(DomainError::PackageInUse {
                    package_id,
                    assigned_pilgrims,
                    registrations,
                }
                .into());
            }
            tx.delete_package(package_id)
        })?;

        info!(package_id = package_id.value(), actor = %actor.id, "Deleted package");
        self.notify(
            actor,
            EntityType::Package,
            package_id.value(),
            "DeletePackage",
            None,
        );
        Ok(())
    }

    /// Rebuilds a package's seat counter from the attached pilgrims.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CapacityExceeded`, or a store error.
    pub fn recompute_capacity(
        &mut self,
        actor: &Actor,
        package_id: PackageId,
    ) -> Result<Package, CoreError> {
        let package: Package = self.store.transaction(|tx| {
            capacity::recompute(tx, package_id)?;
            require_package(tx, package_id)
        })?;

        info!(
            package_id = package_id.value(),
            occupied = package.occupied_seats,
            actor = %actor.id,
            "Recomputed package capacity"
        );
        self.notify(
            actor,
            EntityType::Package,
            package_id.value(),
            "RecomputeCapacity",
            Some(format!("occupied_seats={}", package.occupied_seats)),
        );
        Ok(package)
    }
}

fn apply_pilgrim_changes(
    tx: &mut dyn Transaction,
    pilgrim_id: PilgrimId,
    changes: &PilgrimChanges,
    now: &str,
) -> Result<Pilgrim, CoreError> {
    let current: Pilgrim = live_pilgrim(tx, pilgrim_id)?;
    let merged: PilgrimProfile = changes.apply_to(&current.profile)?;

    let national_id_changed: bool = merged.national_id != current.profile.national_id;
    let passport_changed: bool = merged.passport_number != current.profile.passport_number;
    if current.status.is_live() && (national_id_changed || passport_changed) {
        identity::ensure_not_taken(
            tx,
            merged.national_id.as_ref().filter(|_| national_id_changed),
            merged.passport_number.as_ref().filter(|_| passport_changed),
            Some(pilgrim_id),
        )?;
    }

    let new_package: Option<PackageId> = changes.package_id.unwrap_or(current.package_id);
    let package_changed: bool = new_package != current.package_id;
    if package_changed {
        if let Some(old_package) = current.attached_package() {
            capacity::detach(tx, pilgrim_id, old_package)?;
        }
        if let Some(package_id) = new_package {
            if current.status.is_live() {
                capacity::attach(tx, pilgrim_id, package_id)?;
            } else {
                require_package(tx, package_id)?;
            }
        }
    }

    tx.update_pilgrim_profile(pilgrim_id, &merged, now)?;
    if package_changed {
        tx.set_pilgrim_package(pilgrim_id, new_package, now)?;
        for package_id in current.package_id.into_iter().chain(new_package) {
            capacity::recompute(tx, package_id)?;
        }
    }
    payments::recalculate(tx, pilgrim_id)?;
    live_pilgrim(tx, pilgrim_id)
}

fn live_pilgrim(tx: &mut dyn Transaction, pilgrim_id: PilgrimId) -> Result<Pilgrim, CoreError> {
    tx.find_pilgrim(pilgrim_id)?
        .filter(|pilgrim| !pilgrim.deleted)
        .ok_or_else(|| DomainError::PilgrimNotFound(pilgrim_id).into())
}

fn require_package(tx: &mut dyn Transaction, package_id: PackageId) -> Result<Package, CoreError> {
    tx.find_package(package_id)?
        .ok_or_else(|| DomainError::PackageNotFound(package_id).into())
}

fn load_payment(tx: &mut dyn Transaction, payment_id: PaymentId) -> Result<Payment, CoreError> {
    tx.find_payment(payment_id)?
        .ok_or_else(|| DomainError::PaymentNotFound(payment_id).into())
}

fn timestamp() -> Result<String, CoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| StoreError::Backend(format!("Failed to format timestamp: {err}")).into())
}
