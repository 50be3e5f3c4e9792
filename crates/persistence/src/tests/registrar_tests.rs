// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine end to end over `SQLite`.

use jamaah_audit::NullAuditSink;
use jamaah_core::{BulkOutcome, CoreError, ErrorKind, RecordedPayment, RegisteredPilgrim, Registrar};
use jamaah_domain::{
    Package, PackageId, Payment, PaymentId, PaymentStatus, Pilgrim, PilgrimDraft, PilgrimId,
    PilgrimPatch, PilgrimStatus, Registration, RegistrationId, RegistrationStatus,
};

use super::{
    create_test_actor, create_test_payment_draft, create_test_pilgrim_draft, occupied_seats,
    seed_package, seed_pilgrim,
};
use crate::{Persistence, PilgrimFilter};

fn passport_draft(passport: &str, packages: &[PackageId]) -> PilgrimDraft {
    PilgrimDraft {
        full_name: Some(String::from("Multi Package")),
        gender: Some(String::from("M")),
        passport_number: Some(passport.to_string()),
        package_ids: Some(packages.iter().map(|id| id.value()).collect()),
        ..PilgrimDraft::default()
    }
}

#[test]
fn test_full_package_refuses_second_pilgrim() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 1, 1_000, "2027-01-01", "2027-01-10");
    seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let draft: PilgrimDraft = PilgrimDraft {
        package_id: Some(package_id.value()),
        ..create_test_pilgrim_draft("Second", "2222222222222222")
    };
    let result: Result<Pilgrim, CoreError> = registrar.register_pilgrim(&create_test_actor(), &draft);

    assert_eq!(result.unwrap_err().kind(), ErrorKind::CapacityExceeded);
    assert_eq!(occupied_seats(&mut persistence, package_id), 1);
    let pilgrims: Vec<Pilgrim> = persistence
        .list_pilgrims(&PilgrimFilter::default())
        .unwrap();
    assert_eq!(pilgrims.len(), 1);
}

#[test]
fn test_payments_drive_status_to_paid() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId = seed_package(
        &mut persistence,
        "HAJ-01",
        40,
        10_000_000,
        "2027-05-01",
        "2027-06-10",
    );
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let first: RecordedPayment = registrar
        .record_payment(
            &create_test_actor(),
            pilgrim_id,
            &create_test_payment_draft(4_000_000, "2026-10-01"),
        )
        .unwrap();
    assert_eq!(first.summary.total_paid().minor(), 4_000_000);
    assert_eq!(first.summary.remaining_balance().minor(), 6_000_000);
    assert_eq!(first.summary.status(), PaymentStatus::Partial);

    let second: RecordedPayment = registrar
        .record_payment(
            &create_test_actor(),
            pilgrim_id,
            &create_test_payment_draft(6_000_000, "2026-11-01"),
        )
        .unwrap();
    assert_eq!(second.summary.status(), PaymentStatus::Paid);

    let stored: Pilgrim = persistence.get_pilgrim(pilgrim_id).unwrap().unwrap();
    assert_eq!(stored.total_paid.minor(), 10_000_000);
    assert_eq!(stored.remaining_balance.minor(), 0);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
    assert_eq!(persistence.list_payments(pilgrim_id).unwrap().len(), 2);
}

#[test]
fn test_payment_overflowing_total_rolls_back() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    registrar
        .record_payment(
            &create_test_actor(),
            pilgrim_id,
            &create_test_payment_draft(i64::MAX, "2026-10-01"),
        )
        .unwrap();
    let result: Result<RecordedPayment, CoreError> = registrar.record_payment(
        &create_test_actor(),
        pilgrim_id,
        &create_test_payment_draft(i64::MAX, "2026-10-02"),
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);

    let stored: Pilgrim = persistence.get_pilgrim(pilgrim_id).unwrap().unwrap();
    assert_eq!(stored.total_paid.minor(), i64::MAX);
    assert_eq!(persistence.list_payments(pilgrim_id).unwrap().len(), 1);
}

#[test]
fn test_duplicate_national_id_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed_pilgrim(&mut persistence, "1111111111111111", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let result: Result<Pilgrim, CoreError> = registrar.register_pilgrim(
        &create_test_actor(),
        &create_test_pilgrim_draft("Copy", "1111111111111111"),
    );

    assert_eq!(result.unwrap_err().kind(), ErrorKind::DuplicateIdentity);
}

#[test]
fn test_overlapping_packages_in_multi_flow() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let x: PackageId = seed_package(&mut persistence, "X", 10, 1_000, "2027-01-01", "2027-01-14");
    let y: PackageId = seed_package(&mut persistence, "Y", 10, 1_000, "2027-01-10", "2027-01-20");
    let z: PackageId = seed_package(&mut persistence, "Z", 10, 1_000, "2027-02-01", "2027-02-14");

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let registered: RegisteredPilgrim = registrar
        .register_pilgrim_with_packages(&create_test_actor(), &passport_draft("B1234567", &[x]))
        .unwrap();
    let pilgrim_id: PilgrimId = registered.pilgrim.pilgrim_id;

    let overlap: Result<RegistrationId, CoreError> = registrar.register_package(&create_test_actor(), pilgrim_id, y);
    assert_eq!(overlap.unwrap_err().kind(), ErrorKind::OverlapConflict);
    assert!(registrar.register_package(&create_test_actor(), pilgrim_id, z).is_ok());

    let registrations: Vec<Registration> = persistence.list_registrations(pilgrim_id).unwrap();
    let packages: Vec<PackageId> = registrations.iter().map(|r| r.package_id).collect();
    assert_eq!(packages, vec![x, z]);
    assert!(
        registrations
            .iter()
            .all(|r| r.status == RegistrationStatus::Active)
    );
}

#[test]
fn test_overlap_in_request_rolls_back_pilgrim() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let x: PackageId = seed_package(&mut persistence, "X", 10, 1_000, "2027-01-01", "2027-01-14");
    let y: PackageId = seed_package(&mut persistence, "Y", 10, 1_000, "2027-01-10", "2027-01-20");

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let result: Result<RegisteredPilgrim, CoreError> = registrar
        .register_pilgrim_with_packages(&create_test_actor(), &passport_draft("B1234567", &[x, y]));

    assert_eq!(result.unwrap_err().kind(), ErrorKind::OverlapConflict);
    assert!(
        persistence
            .list_pilgrims(&PilgrimFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_moving_pilgrim_between_packages() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let from: PackageId = seed_package(&mut persistence, "A", 5, 1_000, "2027-01-01", "2027-01-10");
    let to: PackageId = seed_package(&mut persistence, "B", 5, 2_000, "2027-03-01", "2027-03-10");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(from));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let patch: PilgrimPatch = PilgrimPatch {
        package_id: Some(Some(to.value())),
        ..PilgrimPatch::default()
    };
    let updated: Pilgrim = registrar
        .update_pilgrim(&create_test_actor(), pilgrim_id, &patch)
        .unwrap();

    assert_eq!(updated.package_id, Some(to));
    assert_eq!(updated.remaining_balance.minor(), 2_000);
    assert_eq!(occupied_seats(&mut persistence, from), 0);
    assert_eq!(occupied_seats(&mut persistence, to), 1);
}

#[test]
fn test_soft_delete_frees_seat_and_identity() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 1, 1_000, "2027-01-01", "2027-01-10");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    registrar
        .delete_pilgrim(&create_test_actor(), pilgrim_id)
        .unwrap();
    let replacement: PilgrimDraft = PilgrimDraft {
        package_id: Some(package_id.value()),
        ..create_test_pilgrim_draft("Replacement", "1111111111111111")
    };
    let result: Result<Pilgrim, CoreError> =
        registrar.register_pilgrim(&create_test_actor(), &replacement);

    assert!(result.is_ok());
    let deleted: Pilgrim = persistence.get_pilgrim(pilgrim_id).unwrap().unwrap();
    assert!(deleted.deleted);
    assert!(deleted.deleted_at.is_some());
    assert_eq!(occupied_seats(&mut persistence, package_id), 1);
}

#[test]
fn test_cancel_and_reactivate_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 1, 1_000, "2027-01-01", "2027-01-10");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let cancelled: Pilgrim = registrar
        .change_status(
            &create_test_actor(),
            pilgrim_id,
            PilgrimStatus::Cancelled,
            Some("visa refused"),
        )
        .unwrap();
    assert_eq!(cancelled.status, PilgrimStatus::Cancelled);
    assert_eq!(cancelled.status_notes.as_deref(), Some("visa refused"));

    let reactivated: Pilgrim = registrar
        .reactivate_pilgrim(&create_test_actor(), pilgrim_id)
        .unwrap();
    assert_eq!(reactivated.status, PilgrimStatus::Pending);
    assert_eq!(occupied_seats(&mut persistence, package_id), 1);
}

#[test]
fn test_package_deletion_guard() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 3, 1_000, "2027-01-01", "2027-01-10");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let refused: Result<(), CoreError> = registrar.delete_package(&create_test_actor(), package_id);
    assert_eq!(refused.unwrap_err().kind(), ErrorKind::PackageInUse);

    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();
    let refused_while_cancelled: Result<(), CoreError> =
        registrar.delete_package(&create_test_actor(), package_id);
    assert_eq!(
        refused_while_cancelled.unwrap_err().kind(),
        ErrorKind::PackageInUse
    );

    let reactivated: Pilgrim = registrar
        .reactivate_pilgrim(&create_test_actor(), pilgrim_id)
        .unwrap();
    assert_eq!(reactivated.package_id, Some(package_id));

    registrar
        .delete_pilgrim(&create_test_actor(), pilgrim_id)
        .unwrap();
    registrar
        .delete_package(&create_test_actor(), package_id)
        .unwrap();

    assert!(persistence.get_package(package_id).unwrap().is_none());
    let deleted: Pilgrim = persistence.get_pilgrim(pilgrim_id).unwrap().unwrap();
    assert!(deleted.deleted);
    assert_eq!(deleted.package_id, None);
}

#[test]
fn test_cancelled_registration_keeps_package_and_history() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 3, 1_000, "2027-01-01", "2027-01-10");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    registrar
        .register_package(&create_test_actor(), pilgrim_id, package_id)
        .unwrap();
    registrar
        .unregister_package(&create_test_actor(), pilgrim_id, package_id)
        .unwrap();
    let refused: Result<(), CoreError> = registrar.delete_package(&create_test_actor(), package_id);

    assert_eq!(refused.unwrap_err().kind(), ErrorKind::PackageInUse);
    assert!(persistence.get_package(package_id).unwrap().is_some());
    assert_eq!(persistence.list_registrations(pilgrim_id).unwrap().len(), 1);
}

#[test]
fn test_bulk_verify_over_sqlite() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let first: PaymentId = registrar
        .record_payment(
            &create_test_actor(),
            pilgrim_id,
            &create_test_payment_draft(100, "2026-10-01"),
        )
        .unwrap()
        .payment
        .payment_id;
    let third: PaymentId = registrar
        .record_payment(
            &create_test_actor(),
            pilgrim_id,
            &create_test_payment_draft(200, "2026-10-02"),
        )
        .unwrap()
        .payment
        .payment_id;

    let outcome: BulkOutcome<Payment> = registrar.bulk_verify_payments(
        &create_test_actor(),
        &[first, PaymentId::new(9_999), third],
    );

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].item_id, 9_999);
    assert_eq!(outcome.errors[0].kind, ErrorKind::NotFound);
    let verified: Payment = persistence.get_payment(first).unwrap().unwrap();
    assert_eq!(verified.verified_by.as_deref(), Some("admin-123"));
    assert!(verified.verified_at.is_some());
}

#[test]
fn test_recompute_capacity_matches_attached_pilgrims() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 5, 1_000, "2027-01-01", "2027-01-10");
    seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));
    seed_pilgrim(&mut persistence, "2222222222222222", Some(package_id));

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let package: Package = registrar
        .recompute_capacity(&create_test_actor(), package_id)
        .unwrap();

    assert_eq!(package.occupied_seats, 2);
}
