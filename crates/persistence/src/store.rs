// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine's transaction seam over `SQLite`.
//!
//! Every engine transaction is opened with `BEGIN IMMEDIATE`, so the write
//! lock is held from the first read. A package read inside the transaction
//! therefore cannot change before commit, which is why `lock_package` is a
//! plain read here.

use diesel::SqliteConnection;
use jamaah_core::{
    CoreError, NewPilgrim, PaymentSummary, SeatCount, Store, StoreError, Transaction,
};
use jamaah_domain::{
    BookedTrip, IdentityMatch, Money, NationalId, Package, PackageDetails, PackageId,
    PassportNumber, Payment, PaymentDetails, PaymentId, Pilgrim, PilgrimId, PilgrimProfile,
    PilgrimStatus, RegistrationId,
};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::Persistence;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Why an immediate transaction ended without committing.
enum TxFailure {
    Engine(CoreError),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TxFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

impl From<TxFailure> for CoreError {
    fn from(failure: TxFailure) -> Self {
        match failure {
            TxFailure::Engine(err) => err,
            TxFailure::Database(err) => Self::from(PersistenceError::from(err)),
        }
    }
}

fn to_count(value: i64) -> Result<u32, CoreError> {
    value
        .to_u32()
        .ok_or_else(|| CoreError::Store(StoreError::Backend(format!("invalid count {value}"))))
}

/// A [`Transaction`] borrowing a connection inside an open transaction.
pub struct SqliteTransaction<'c> {
    conn: &'c mut SqliteConnection,
}

impl Transaction for SqliteTransaction<'_> {
    fn find_pilgrim(&mut self, pilgrim_id: PilgrimId) -> Result<Option<Pilgrim>, CoreError> {
        Ok(queries::pilgrims::find_pilgrim(self.conn, pilgrim_id)?)
    }

    fn find_identity_matches(
        &mut self,
        national_id: Option<&NationalId>,
        passport_number: Option<&PassportNumber>,
        exclude: Option<PilgrimId>,
    ) -> Result<Vec<IdentityMatch>, CoreError> {
        Ok(queries::pilgrims::find_identity_matches(
            self.conn,
            national_id.map(NationalId::as_str),
            passport_number.map(PassportNumber::as_str),
            exclude,
        )?)
    }

    fn insert_pilgrim(&mut self, pilgrim: &NewPilgrim<'_>) -> Result<PilgrimId, CoreError> {
        Ok(mutations::pilgrims::insert_pilgrim(self.conn, pilgrim)?)
    }

    fn update_pilgrim_profile(
        &mut self,
        pilgrim_id: PilgrimId,
        profile: &PilgrimProfile,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::pilgrims::update_pilgrim_profile(
            self.conn, pilgrim_id, profile, updated_at,
        )?)
    }

    fn set_pilgrim_package(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: Option<PackageId>,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::pilgrims::set_pilgrim_package(
            self.conn, pilgrim_id, package_id, updated_at,
        )?)
    }

    fn set_pilgrim_status(
        &mut self,
        pilgrim_id: PilgrimId,
        status: PilgrimStatus,
        notes: Option<&str>,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::pilgrims::set_pilgrim_status(
            self.conn, pilgrim_id, status, notes, updated_at,
        )?)
    }

    fn mark_pilgrim_deleted(
        &mut self,
        pilgrim_id: PilgrimId,
        deleted_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::pilgrims::mark_pilgrim_deleted(
            self.conn, pilgrim_id, deleted_at,
        )?)
    }

    fn write_payment_summary(
        &mut self,
        pilgrim_id: PilgrimId,
        summary: &PaymentSummary,
    ) -> Result<(), CoreError> {
        Ok(mutations::pilgrims::write_payment_summary(
            self.conn, pilgrim_id, summary,
        )?)
    }

    fn pilgrims_on_package(&mut self, package_id: PackageId) -> Result<Vec<PilgrimId>, CoreError> {
        Ok(queries::pilgrims::pilgrims_on_package(self.conn, package_id)?)
    }

    fn find_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError> {
        Ok(queries::packages::find_package(self.conn, package_id)?)
    }

    fn lock_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError> {
        self.find_package(package_id)
    }

    fn find_package_by_code(&mut self, code: &str) -> Result<Option<PackageId>, CoreError> {
        Ok(queries::packages::find_package_by_code(self.conn, code)?)
    }

    fn insert_package(
        &mut self,
        details: &PackageDetails,
        created_at: &str,
    ) -> Result<PackageId, CoreError> {
        Ok(mutations::packages::insert_package(
            self.conn, details, created_at,
        )?)
    }

    fn update_package(
        &mut self,
        package_id: PackageId,
        details: &PackageDetails,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::packages::update_package(
            self.conn, package_id, details, updated_at,
        )?)
    }

    fn delete_package(&mut self, package_id: PackageId) -> Result<(), CoreError> {
        Ok(mutations::packages::delete_package(self.conn, package_id)?)
    }

    fn write_occupied_seats(
        &mut self,
        package_id: PackageId,
        seats: SeatCount,
    ) -> Result<(), CoreError> {
        Ok(mutations::packages::write_occupied_seats(
            self.conn, package_id, seats,
        )?)
    }

    fn count_attached_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        to_count(queries::pilgrims::count_attached_pilgrims(
            self.conn, package_id,
        )?)
    }

    fn count_active_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        to_count(queries::registrations::count_active_registrations(
            self.conn, package_id,
        )?)
    }

    fn count_assigned_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        to_count(queries::pilgrims::count_assigned_pilgrims(
            self.conn, package_id,
        )?)
    }

    fn count_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        to_count(queries::registrations::count_registrations(
            self.conn, package_id,
        )?)
    }

    fn active_bookings(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<BookedTrip>, CoreError> {
        Ok(queries::registrations::active_bookings(self.conn, pilgrim_id)?)
    }

    fn insert_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
        created_by: &str,
        created_at: &str,
    ) -> Result<RegistrationId, CoreError> {
        Ok(mutations::registrations::insert_registration(
            self.conn, pilgrim_id, package_id, created_by, created_at,
        )?)
    }

    fn find_active_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<Option<RegistrationId>, CoreError> {
        Ok(queries::registrations::find_active_registration(
            self.conn, pilgrim_id, package_id,
        )?)
    }

    fn cancel_registration(
        &mut self,
        registration_id: RegistrationId,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::registrations::cancel_registration(
            self.conn,
            registration_id,
            updated_at,
        )?)
    }

    fn insert_payment(
        &mut self,
        pilgrim_id: PilgrimId,
        details: &PaymentDetails,
        created_by: &str,
        created_at: &str,
    ) -> Result<PaymentId, CoreError> {
        Ok(mutations::payments::insert_payment(
            self.conn, pilgrim_id, details, created_by, created_at,
        )?)
    }

    fn find_payment(&mut self, payment_id: PaymentId) -> Result<Option<Payment>, CoreError> {
        Ok(queries::payments::find_payment(self.conn, payment_id)?)
    }

    fn update_payment(
        &mut self,
        payment_id: PaymentId,
        details: &PaymentDetails,
        updated_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::payments::update_payment(
            self.conn, payment_id, details, updated_at,
        )?)
    }

    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<(), CoreError> {
        Ok(mutations::payments::delete_payment(self.conn, payment_id)?)
    }

    fn list_payment_amounts(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<Money>, CoreError> {
        Ok(queries::payments::list_payment_amounts(self.conn, pilgrim_id)?)
    }

    fn mark_payment_verified(
        &mut self,
        payment_id: PaymentId,
        verified_by: &str,
        verified_at: &str,
    ) -> Result<(), CoreError> {
        Ok(mutations::payments::mark_payment_verified(
            self.conn,
            payment_id,
            verified_by,
            verified_at,
        )?)
    }
}

impl Store for Persistence {
    fn transaction<T, F>(&mut self, body: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, CoreError>,
    {
        let result: Result<T, TxFailure> = self.conn.immediate_transaction(|conn| {
            let mut tx: SqliteTransaction<'_> = SqliteTransaction { conn };
            body(&mut tx).map_err(TxFailure::Engine)
        });
        if let Err(TxFailure::Engine(err)) = &result {
            debug!(error = %err, "Transaction rolled back");
        }
        result.map_err(CoreError::from)
    }
}
