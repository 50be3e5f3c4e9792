// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CoreError, NewPilgrim, PaymentSummary, Registrar, SeatCount, Store, StoreError, Transaction,
};
use jamaah_audit::{Actor, AuditError, AuditEvent, AuditSink};
use jamaah_domain::{
    BookedTrip, IdentityMatch, Money, NationalId, Package, PackageDetails, PackageDraft,
    PackageId, PassportNumber, Payment, PaymentDetails, PaymentDraft, PaymentId, PaymentStatus,
    Pilgrim, PilgrimDraft, PilgrimId, PilgrimProfile, PilgrimStatus, Registration,
    RegistrationId, RegistrationStatus,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Everything the fake store holds. Cloned per transaction and swapped back
/// in on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub pilgrims: BTreeMap<PilgrimId, Pilgrim>,
    pub packages: BTreeMap<PackageId, Package>,
    pub registrations: BTreeMap<RegistrationId, Registration>,
    pub payments: BTreeMap<PaymentId, Payment>,
    next_id: i64,
}

impl MemoryState {
    const fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn pilgrim_mut(&mut self, pilgrim_id: PilgrimId) -> Result<&mut Pilgrim, CoreError> {
        self.pilgrims
            .get_mut(&pilgrim_id)
            .ok_or_else(|| StoreError::Backend(format!("no pilgrim row {pilgrim_id}")).into())
    }

    fn package_mut(&mut self, package_id: PackageId) -> Result<&mut Package, CoreError> {
        self.packages
            .get_mut(&package_id)
            .ok_or_else(|| StoreError::Backend(format!("no package row {package_id}")).into())
    }

    fn payment_mut(&mut self, payment_id: PaymentId) -> Result<&mut Payment, CoreError> {
        self.payments
            .get_mut(&payment_id)
            .ok_or_else(|| StoreError::Backend(format!("no payment row {payment_id}")).into())
    }

    /// Mirrors the partial unique indexes of the real schema.
    fn check_unique_indexes(&self) -> Result<(), CoreError> {
        let live: Vec<&Pilgrim> = self
            .pilgrims
            .values()
            .filter(|p| !p.deleted && p.status.is_live())
            .collect();
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                let same_nid: bool = a.profile.national_id.is_some()
                    && a.profile.national_id == b.profile.national_id;
                let same_passport: bool = a.profile.passport_number.is_some()
                    && a.profile.passport_number == b.profile.passport_number;
                if same_nid || same_passport {
                    return Err(StoreError::UniqueViolation(String::from("pilgrims")).into());
                }
            }
        }
        Ok(())
    }

    /// Pilgrims that hold a seat on the package.
    pub fn attached_count(&self, package_id: PackageId) -> u32 {
        u32::try_from(
            self.pilgrims
                .values()
                .filter(|p| p.is_attached_to(package_id))
                .count(),
        )
        .unwrap()
    }

    pub fn package(&self, package_id: PackageId) -> &Package {
        &self.packages[&package_id]
    }

    pub fn pilgrim(&self, pilgrim_id: PilgrimId) -> &Pilgrim {
        &self.pilgrims[&pilgrim_id]
    }

    pub fn active_registrations_of(&self, pilgrim_id: PilgrimId) -> Vec<PackageId> {
        self.registrations
            .values()
            .filter(|r| r.pilgrim_id == pilgrim_id && r.status == RegistrationStatus::Active)
            .map(|r| r.package_id)
            .collect()
    }
}

impl Transaction for MemoryState {
    fn find_pilgrim(&mut self, pilgrim_id: PilgrimId) -> Result<Option<Pilgrim>, CoreError> {
        Ok(self.pilgrims.get(&pilgrim_id).cloned())
    }

    fn find_identity_matches(
        &mut self,
        national_id: Option<&NationalId>,
        passport_number: Option<&PassportNumber>,
        exclude: Option<PilgrimId>,
    ) -> Result<Vec<IdentityMatch>, CoreError> {
        Ok(self
            .pilgrims
            .values()
            .filter(|p| !p.deleted && Some(p.pilgrim_id) != exclude)
            .filter(|p| {
                (national_id.is_some() && p.profile.national_id.as_ref() == national_id)
                    || (passport_number.is_some()
                        && p.profile.passport_number.as_ref() == passport_number)
            })
            .map(|p| IdentityMatch {
                pilgrim_id: p.pilgrim_id,
                national_id: p.profile.national_id.clone(),
                passport_number: p.profile.passport_number.clone(),
                status: p.status,
            })
            .collect())
    }

    fn insert_pilgrim(&mut self, pilgrim: &NewPilgrim<'_>) -> Result<PilgrimId, CoreError> {
        if let Some(package_id) = pilgrim.package_id
            && !self.packages.contains_key(&package_id)
        {
            return Err(StoreError::Backend(String::from("FOREIGN KEY constraint failed")).into());
        }
        let pilgrim_id: PilgrimId = PilgrimId::new(self.next_id());
        self.pilgrims.insert(
            pilgrim_id,
            Pilgrim {
                pilgrim_id,
                profile: pilgrim.profile.clone(),
                status: pilgrim.status,
                status_notes: None,
                deleted: false,
                deleted_at: None,
                package_id: pilgrim.package_id,
                total_paid: Money::ZERO,
                remaining_balance: Money::ZERO,
                payment_status: PaymentStatus::Unpaid,
                created_by: pilgrim.created_by.to_string(),
            },
        );
        self.check_unique_indexes()?;
        Ok(pilgrim_id)
    }

    fn update_pilgrim_profile(
        &mut self,
        pilgrim_id: PilgrimId,
        profile: &PilgrimProfile,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        self.pilgrim_mut(pilgrim_id)?.profile = profile.clone();
        self.check_unique_indexes()
    }

    fn set_pilgrim_package(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: Option<PackageId>,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        self.pilgrim_mut(pilgrim_id)?.package_id = package_id;
        Ok(())
    }

    fn set_pilgrim_status(
        &mut self,
        pilgrim_id: PilgrimId,
        status: PilgrimStatus,
        notes: Option<&str>,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        let pilgrim: &mut Pilgrim = self.pilgrim_mut(pilgrim_id)?;
        pilgrim.status = status;
        pilgrim.status_notes = notes.map(str::to_string);
        self.check_unique_indexes()
    }

    fn mark_pilgrim_deleted(
        &mut self,
        pilgrim_id: PilgrimId,
        deleted_at: &str,
    ) -> Result<(), CoreError> {
        let pilgrim: &mut Pilgrim = self.pilgrim_mut(pilgrim_id)?;
        pilgrim.deleted = true;
        pilgrim.deleted_at = Some(deleted_at.to_string());
        Ok(())
    }

    fn write_payment_summary(
        &mut self,
        pilgrim_id: PilgrimId,
        summary: &PaymentSummary,
    ) -> Result<(), CoreError> {
        let pilgrim: &mut Pilgrim = self.pilgrim_mut(pilgrim_id)?;
        pilgrim.total_paid = summary.total_paid();
        pilgrim.remaining_balance = summary.remaining_balance();
        pilgrim.payment_status = summary.status();
        Ok(())
    }

    fn pilgrims_on_package(&mut self, package_id: PackageId) -> Result<Vec<PilgrimId>, CoreError> {
        Ok(self
            .pilgrims
            .values()
            .filter(|p| !p.deleted && p.package_id == Some(package_id))
            .map(|p| p.pilgrim_id)
            .collect())
    }

    fn find_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError> {
        Ok(self.packages.get(&package_id).cloned())
    }

    fn lock_package(&mut self, package_id: PackageId) -> Result<Option<Package>, CoreError> {
        self.find_package(package_id)
    }

    fn find_package_by_code(&mut self, code: &str) -> Result<Option<PackageId>, CoreError> {
        Ok(self
            .packages
            .values()
            .find(|p| p.code == code)
            .map(|p| p.package_id))
    }

    fn insert_package(
        &mut self,
        details: &PackageDetails,
        _created_at: &str,
    ) -> Result<PackageId, CoreError> {
        let package_id: PackageId = PackageId::new(self.next_id());
        self.packages.insert(
            package_id,
            Package {
                package_id,
                code: details.code.clone(),
                name: details.name.clone(),
                price: details.price,
                total_capacity: details.total_capacity,
                occupied_seats: 0,
                travel_dates: details.travel_dates,
            },
        );
        Ok(package_id)
    }

    fn update_package(
        &mut self,
        package_id: PackageId,
        details: &PackageDetails,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        let package: &mut Package = self.package_mut(package_id)?;
        package.code = details.code.clone();
        package.name = details.name.clone();
        package.price = details.price;
        package.total_capacity = details.total_capacity;
        package.travel_dates = details.travel_dates;
        Ok(())
    }

    fn delete_package(&mut self, package_id: PackageId) -> Result<(), CoreError> {
        self.packages.remove(&package_id);
        for pilgrim in self.pilgrims.values_mut() {
            if pilgrim.package_id == Some(package_id) {
                pilgrim.package_id = None;
            }
        }
        Ok(())
    }

    fn write_occupied_seats(
        &mut self,
        package_id: PackageId,
        seats: SeatCount,
    ) -> Result<(), CoreError> {
        let package: &mut Package = self.package_mut(package_id)?;
        if seats.value() > package.total_capacity {
            return Err(StoreError::Backend(String::from("CHECK constraint failed")).into());
        }
        package.occupied_seats = seats.value();
        Ok(())
    }

    fn count_attached_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        Ok(self.attached_count(package_id))
    }

    fn count_active_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        Ok(u32::try_from(
            self.registrations
                .values()
                .filter(|r| r.package_id == package_id && r.status == RegistrationStatus::Active)
                .count(),
        )
        .unwrap_or(u32::MAX))
    }

    fn count_assigned_pilgrims(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        Ok(u32::try_from(
            self.pilgrims
                .values()
                .filter(|p| !p.deleted && p.package_id == Some(package_id))
                .count(),
        )
        .unwrap_or(u32::MAX))
    }

    fn count_registrations(&mut self, package_id: PackageId) -> Result<u32, CoreError> {
        Ok(u32::try_from(
            self.registrations
                .values()
                .filter(|r| r.package_id == package_id)
                .count(),
        )
        .unwrap_or(u32::MAX))
    }

    fn active_bookings(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<BookedTrip>, CoreError> {
        let mut active: Vec<&Registration> = self
            .registrations
            .values()
            .filter(|r| r.pilgrim_id == pilgrim_id && r.status == RegistrationStatus::Active)
            .collect();
        active.sort_by(|a, b| {
            (&a.created_at, a.registration_id).cmp(&(&b.created_at, b.registration_id))
        });
        Ok(active
            .into_iter()
            .filter_map(|r| {
                self.packages.get(&r.package_id).map(|p| BookedTrip {
                    registration_id: r.registration_id,
                    package_id: r.package_id,
                    travel_dates: p.travel_dates,
                })
            })
            .collect())
    }

    fn insert_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
        created_by: &str,
        created_at: &str,
    ) -> Result<RegistrationId, CoreError> {
        let registration_id: RegistrationId = RegistrationId::new(self.next_id());
        self.registrations.insert(
            registration_id,
            Registration {
                registration_id,
                pilgrim_id,
                package_id,
                status: RegistrationStatus::Active,
                created_by: created_by.to_string(),
                created_at: created_at.to_string(),
            },
        );
        Ok(registration_id)
    }

    fn find_active_registration(
        &mut self,
        pilgrim_id: PilgrimId,
        package_id: PackageId,
    ) -> Result<Option<RegistrationId>, CoreError> {
        Ok(self
            .registrations
            .values()
            .find(|r| {
                r.pilgrim_id == pilgrim_id
                    && r.package_id == package_id
                    && r.status == RegistrationStatus::Active
            })
            .map(|r| r.registration_id))
    }

    fn cancel_registration(
        &mut self,
        registration_id: RegistrationId,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        if let Some(registration) = self.registrations.get_mut(&registration_id) {
            registration.status = RegistrationStatus::Cancelled;
        }
        Ok(())
    }

    fn insert_payment(
        &mut self,
        pilgrim_id: PilgrimId,
        details: &PaymentDetails,
        created_by: &str,
        _created_at: &str,
    ) -> Result<PaymentId, CoreError> {
        let payment_id: PaymentId = PaymentId::new(self.next_id());
        self.payments.insert(
            payment_id,
            Payment {
                payment_id,
                pilgrim_id,
                amount: details.amount,
                payment_date: details.payment_date,
                method: details.method,
                reference_number: details.reference_number.clone(),
                notes: details.notes.clone(),
                receipt_ref: details.receipt_ref.clone(),
                created_by: created_by.to_string(),
                verified_by: None,
                verified_at: None,
            },
        );
        Ok(payment_id)
    }

    fn find_payment(&mut self, payment_id: PaymentId) -> Result<Option<Payment>, CoreError> {
        Ok(self.payments.get(&payment_id).cloned())
    }

    fn update_payment(
        &mut self,
        payment_id: PaymentId,
        details: &PaymentDetails,
        _updated_at: &str,
    ) -> Result<(), CoreError> {
        let payment: &mut Payment = self.payment_mut(payment_id)?;
        payment.amount = details.amount;
        payment.payment_date = details.payment_date;
        payment.method = details.method;
        payment.reference_number = details.reference_number.clone();
        payment.notes = details.notes.clone();
        payment.receipt_ref = details.receipt_ref.clone();
        Ok(())
    }

    fn delete_payment(&mut self, payment_id: PaymentId) -> Result<(), CoreError> {
        self.payments.remove(&payment_id);
        Ok(())
    }

    fn list_payment_amounts(&mut self, pilgrim_id: PilgrimId) -> Result<Vec<Money>, CoreError> {
        Ok(self
            .payments
            .values()
            .filter(|p| p.pilgrim_id == pilgrim_id)
            .map(|p| p.amount)
            .collect())
    }

    fn mark_payment_verified(
        &mut self,
        payment_id: PaymentId,
        verified_by: &str,
        verified_at: &str,
    ) -> Result<(), CoreError> {
        let payment: &mut Payment = self.payment_mut(payment_id)?;
        payment.verified_by = Some(verified_by.to_string());
        payment.verified_at = Some(verified_at.to_string());
        Ok(())
    }
}

/// An in-memory store with all-or-nothing transactions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: MemoryState,
    pub transactions: usize,
}

impl Store for MemoryStore {
    fn transaction<T, F>(&mut self, body: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, CoreError>,
    {
        self.transactions += 1;
        let mut working: MemoryState = self.state.clone();
        let result: Result<T, CoreError> = body(&mut working);
        if result.is_ok() {
            self.state = working;
        }
        result
    }
}

/// Keeps every event it is handed.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn action_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.name.clone())
            .collect()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Refuses every event.
#[derive(Debug, Default)]
pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Closed)
    }
}

pub fn create_test_actor() -> Actor {
    Actor::staff("admin-123")
}

pub fn create_test_pilgrim_draft(name: &str, national_id: &str) -> PilgrimDraft {
    PilgrimDraft {
        full_name: Some(name.to_string()),
        gender: Some(String::from("M")),
        national_id: Some(national_id.to_string()),
        ..PilgrimDraft::default()
    }
}

pub fn create_test_package_draft(
    code: &str,
    capacity: i64,
    price: i64,
    departure: &str,
    return_date: &str,
) -> PackageDraft {
    PackageDraft {
        code: Some(code.to_string()),
        name: Some(format!("Package {code}")),
        price: Some(price),
        total_capacity: Some(capacity),
        departure_date: Some(departure.to_string()),
        return_date: Some(return_date.to_string()),
    }
}

pub fn create_test_payment_draft(amount: i64) -> PaymentDraft {
    PaymentDraft {
        amount: Some(amount),
        payment_date: Some(String::from("2026-10-01")),
        method: Some(String::from("transfer")),
        ..PaymentDraft::default()
    }
}

/// Creates a package through the registrar and returns its id.
pub fn seed_package(
    store: &mut MemoryStore,
    code: &str,
    capacity: i64,
    price: i64,
    departure: &str,
    return_date: &str,
) -> PackageId {
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(store, &sink);
    registrar
        .create_package(
            &create_test_actor(),
            &create_test_package_draft(code, capacity, price, departure, return_date),
        )
        .unwrap()
        .package_id
}

/// Registers a pilgrim through the single-package flow and returns its id.
pub fn seed_pilgrim(
    store: &mut MemoryStore,
    national_id: &str,
    package_id: Option<PackageId>,
) -> PilgrimId {
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(store, &sink);
    let draft: PilgrimDraft = PilgrimDraft {
        package_id: package_id.map(|id| id.value()),
        ..create_test_pilgrim_draft("Test Pilgrim", national_id)
    };
    registrar
        .register_pilgrim(&create_test_actor(), &draft)
        .unwrap()
        .pilgrim_id
}

/// Asserts the seat counter of every package matches the attached pilgrims.
pub fn assert_capacity_consistent(state: &MemoryState) {
    for package in state.packages.values() {
        assert_eq!(
            package.occupied_seats,
            state.attached_count(package.package_id),
            "package {} counter drifted",
            package.package_id
        );
        assert!(package.occupied_seats <= package.total_capacity);
    }
}
