// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    MemoryStore, RecordingAuditSink, assert_capacity_consistent, create_test_actor,
    create_test_pilgrim_draft, seed_package, seed_pilgrim,
};
use crate::{CoreError, ErrorKind, Registrar};
use jamaah_domain::{
    DomainError, PackageId, Pilgrim, PilgrimDraft, PilgrimId, PilgrimPatch, PilgrimStatus,
};

#[test]
fn test_change_status_records_notes() {
    let mut store: MemoryStore = MemoryStore::default();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", None);
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);

    let result: Result<Pilgrim, CoreError> = registrar.change_status(
        &create_test_actor(),
        pilgrim_id,
        PilgrimStatus::Active,
        Some("documents complete"),
    );

    let pilgrim: Pilgrim = result.unwrap();
    assert_eq!(pilgrim.status, PilgrimStatus::Active);
    assert_eq!(pilgrim.status_notes.as_deref(), Some("documents complete"));
}

#[test]
fn test_cancelling_releases_seat() {
    let mut store: MemoryStore = MemoryStore::default();
    let package_id: PackageId =
        seed_package(&mut store, "UMR", 2, 1_000, "2027-01-01", "2027-01-14");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", Some(package_id));
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);

    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();

    let pilgrim: &Pilgrim = store.state.pilgrim(pilgrim_id);
    assert_eq!(pilgrim.status, PilgrimStatus::Cancelled);
    // the assignment is kept for a later reactivation
    assert_eq!(pilgrim.package_id, Some(package_id));
    assert_eq!(store.state.package(package_id).occupied_seats, 0);
    assert_capacity_consistent(&store.state);
}

#[test]
fn test_completed_keeps_seat() {
    let mut store: MemoryStore = MemoryStore::default();
    let package_id: PackageId =
        seed_package(&mut store, "UMR", 2, 1_000, "2027-01-01", "2027-01-14");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", Some(package_id));
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);

    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Completed, None)
        .unwrap();

    assert_eq!(store.state.package(package_id).occupied_seats, 1);
}

#[test]
fn test_leaving_cancelled_through_change_status_is_refused() {
    let mut store: MemoryStore = MemoryStore::default();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", None);
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);
    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();

    let result: Result<Pilgrim, CoreError> =
        registrar.change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Active, None);

    let err: CoreError = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::InvalidStatusTransition {
            from: PilgrimStatus::Cancelled,
            to: PilgrimStatus::Active,
        })
    );
}

#[test]
fn test_reactivate_restores_pending_and_seat() {
    let mut store: MemoryStore = MemoryStore::default();
    let package_id: PackageId =
        seed_package(&mut store, "UMR", 2, 8_000, "2027-01-01", "2027-01-14");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", Some(package_id));
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);
    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();

    let result: Result<Pilgrim, CoreError> =
        registrar.reactivate_pilgrim(&create_test_actor(), pilgrim_id);

    let pilgrim: Pilgrim = result.unwrap();
    assert_eq!(pilgrim.status, PilgrimStatus::Pending);
    assert_eq!(pilgrim.remaining_balance.minor(), 8_000);
    assert_eq!(store.state.package(package_id).occupied_seats, 1);
    assert_capacity_consistent(&store.state);
}

#[test]
fn test_reactivate_non_cancelled_is_refused() {
    let mut store: MemoryStore = MemoryStore::default();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", None);
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);

    let result: Result<Pilgrim, CoreError> =
        registrar.reactivate_pilgrim(&create_test_actor(), pilgrim_id);

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidStatusTransition {
            from: PilgrimStatus::Pending,
            to: PilgrimStatus::Pending,
        })
    );
}

#[test]
fn test_reactivate_when_identity_taken_meanwhile() {
    let mut store: MemoryStore = MemoryStore::default();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", None);
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);
    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();
    // a live pilgrim now holds the passport the cancelled one also carries
    let passport_patch: PilgrimPatch = PilgrimPatch {
        passport_number: Some(String::from("B7654321")),
        ..PilgrimPatch::default()
    };
    registrar
        .update_pilgrim(&create_test_actor(), pilgrim_id, &passport_patch)
        .unwrap();
    let holder: PilgrimDraft = PilgrimDraft {
        passport_number: Some(String::from("B7654321")),
        ..create_test_pilgrim_draft("Holder", "2222222222222222")
    };
    // the only collision is with a cancelled pilgrim, so registration is
    // offered reactivation rather than accepted
    let offered: Result<Pilgrim, CoreError> =
        registrar.register_pilgrim(&create_test_actor(), &holder);
    assert_eq!(offered.unwrap_err().kind(), ErrorKind::ReactivationCandidate);

    let clear_patch: PilgrimPatch = PilgrimPatch {
        passport_number: Some(String::new()),
        ..PilgrimPatch::default()
    };
    registrar
        .update_pilgrim(&create_test_actor(), pilgrim_id, &clear_patch)
        .unwrap();
    registrar.register_pilgrim(&create_test_actor(), &holder).unwrap();
    registrar
        .update_pilgrim(&create_test_actor(), pilgrim_id, &passport_patch)
        .unwrap();

    let result: Result<Pilgrim, CoreError> =
        registrar.reactivate_pilgrim(&create_test_actor(), pilgrim_id);

    assert_eq!(result.unwrap_err().kind(), ErrorKind::DuplicateIdentity);
    assert_eq!(
        store.state.pilgrim(pilgrim_id).status,
        PilgrimStatus::Cancelled
    );
}

#[test]
fn test_reactivate_into_full_package_is_refused() {
    let mut store: MemoryStore = MemoryStore::default();
    let package_id: PackageId =
        seed_package(&mut store, "UMR", 1, 1_000, "2027-01-01", "2027-01-14");
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut store, "1111111111111111", Some(package_id));
    let sink: RecordingAuditSink = RecordingAuditSink::default();
    let mut registrar: Registrar<'_, MemoryStore> = Registrar::new(&mut store, &sink);
    registrar
        .change_status(&create_test_actor(), pilgrim_id, PilgrimStatus::Cancelled, None)
        .unwrap();
    let taker: PilgrimDraft = PilgrimDraft {
        package_id: Some(package_id.value()),
        ..create_test_pilgrim_draft("Seat Taker", "2222222222222222")
    };
    registrar.register_pilgrim(&create_test_actor(), &taker).unwrap();

    let result: Result<Pilgrim, CoreError> =
        registrar.reactivate_pilgrim(&create_test_actor(), pilgrim_id);

    assert_eq!(result.unwrap_err().kind(), ErrorKind::CapacityExceeded);
    assert_eq!(
        store.state.pilgrim(pilgrim_id).status,
        PilgrimStatus::Cancelled
    );
    assert_capacity_consistent(&store.state);
}
