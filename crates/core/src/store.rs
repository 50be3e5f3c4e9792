// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The persistence seam of the engine.
//!
//! A `Store` runs a body against a `Transaction` and commits only when the
//! body returns `Ok`. Every engine operation is one such body, so the same
//! orchestration runs against SQLite in production and an in-memory fake in
//! tests.

use crate::capacity::SeatCount;
use crate::error::CoreError;
use crate::payments::PaymentSummary;
use jamaah_domain::{
    BookedTrip, IdentityMatch, Money, NationalId, Package, PackageDetails, PackageId,
    PassportNumber, Payment, PaymentDetails, PaymentId, Pilgrim, PilgrimId, PilgrimProfile,
    PilgrimStatus, RegistrationId,
};

/// A pilgrim row about to be inserted.
///
/// The payment aggregates start at zero and are filled in by the payment
/// ledger within the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPilgrim<'a> {
    pub profile: &'a PilgrimProfile,
    pub package_id: Option<PackageId>,
    pub status: PilgrimStatus,
    pub created_by: &'a str,
    pub created_at: &'a str,
}

/// A unit of work opened by a [`Store`].
///
/// Reads observe the transaction's own writes. Implementations must hold the
/// store's write lock for the whole transaction so a value read here cannot
/// change underneath the caller before commit.
pub trait Transaction {
    /// Loads a pilgrim, deleted or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_pilgrim(&mut self, pilgrim_id: PilgrimId) -> Result<Option<Pilgrim>, CoreError>;

    /// Loads non-deleted pilgrims holding either identity document, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_identity_matches(
        &mut self,
        national_id: Option<&NationalId>,
        passport_number: Option<&PassportNumber>,
        exclude: Option<PilgrimId>,
    ) -> Result<Vec<IdentityMatch>, CoreError>;

    /// Inserts a pilgrim.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a unique index rejects the row.
    fn insert_pilgrim(&mut self, pilgrim: &NewPilgrim<'_>) -> Result<PilgrimId, CoreError>;

    /// Overwrites the personal data of a pilgrim.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a unique index rejects the row.
    fn update_pilgrim_profile(
        &mut self,
        pilgrim_id: PilgrimId,
        profile: &PilgrimProfile,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Sets the single-flow package assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn set_pilgrim_package(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: Option<PackageId>,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Sets the lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a unique index rejects the row.
    fn set_pilgrim_status(
        &mut self,
        pilgrim_id: PilgrimId,
        status: PilgrimStatus,
        notes: Option<&str>,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Soft-deletes a pilgrim.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn mark_pilgrim_deleted(&mut self, pilgrim_id: PilgrimId, deleted_at: &str)
    -> Result<(), CoreError>;

    /// Writes the derived payment fields. Only the payment ledger can build a
    /// `PaymentSummary`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn write_payment_summary(
        &mut self,
        pilgrim_id: PilgrimId,
        summary: &PaymentSummary,
    ) -> Result<(), CoreError>;

    /// Ids of non-deleted pilgrims whose package assignment is `package_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn pilgrims_on_package(&mut self, package_id: PackageId) -> Result<Vec<PilgrimId>, CoreError>;

    /// Loads a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError>;

    /// Re-reads a package for a check-and-write on its seat counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn lock_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError>;

    /// Finds a package by its business code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_package_by_code(&mut self, code: &str) -> Result<Option<PackageId>, CoreError>;

    /// Inserts a package with no seats occupied.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_package(
        &mut self,
        details: &PackageDetails,
        created_at: &str,
    ) -> Result<PackageId, CoreError>;

    /// Overwrites a package's details. The seat counter is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_package(
        &mut self,
        package_id: PackageId,
        details: &PackageDetails,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Removes a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn delete_package(&mut self, package_id: PackageId) -> Result<(), CoreError>;

    /// Writes the seat counter. Only the capacity ledger can build a `SeatCount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn write_occupied_seats(
        &mut self,
        package_id: PackageId,
        seats: SeatCount,
    ) -> Result<(), CoreError>;

    /// Counts non-deleted, non-cancelled pilgrims assigned to the package.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_attached_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError>;

    /// Counts active registrations on the package.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_active_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError>;

    /// Counts non-deleted pilgrims assigned to the package, whatever their status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_assigned_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError>;

    /// Counts every registration on the package, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn count_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError>;

    /// Loads a pilgrim's active registrations with their package dates,
    /// ordered by creation time then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn active_bookings(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<BookedTrip>, CoreError>;

    /// Inserts an active registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
        created_by: &str,
        created_at: &str,
    ) -> Result<RegistrationId, CoreError>;

    /// Finds the active registration linking a pilgrim to a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_active_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<Option<RegistrationId>, CoreError>;

    /// Flips a registration to cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn cancel_registration(
        &mut self,
        registration_id: RegistrationId,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Inserts a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn insert_payment(
        &mut self,
        pilgrim_id: PilgrimId,
        details: &PaymentDetails,
        created_by: &str,
        created_at: &str,
    ) -> Result<PaymentId, CoreError>;

    /// Loads a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn find_payment(&mut self, payment_id: PaymentId) -> Result<Option<Payment>, CoreError>;

    /// Overwrites a payment's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn update_payment(
        &mut self,
        payment_id: PaymentId,
        details: &PaymentDetails,
        updated_at: &str,
    ) -> Result<(), CoreError>;

    /// Removes a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<(), CoreError>;

    /// Returns the amount of every payment of a pilgrim, verified or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn list_payment_amounts(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<Money>, CoreError>;

    /// Stamps the verifier and verification time on a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn mark_payment_verified(
        &mut self,
        payment_id: PaymentId,
        verified_by: &str,
        verified_at: &str,
    ) -> Result<(), CoreError>;
}

/// Something that can run a body inside one atomic transaction.
pub trait Store {
    /// Runs `body` in a transaction, committing on `Ok` and rolling back on `Err`.
    ///
    /// # Errors
    ///
    /// Returns the body's error, or a `CoreError::Store` if the transaction
    /// could not be opened or committed.
    fn transaction<T, F>(&mut self, body: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, CoreError>;
}
