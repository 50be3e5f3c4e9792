// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jamaah_audit::NullAuditSink;
use jamaah_core::Registrar;
use jamaah_domain::{
    Gender, Package, PackageId, Payment, PaymentMethod, Pilgrim, PilgrimDraft, PilgrimId,
    PilgrimStatus,
};

use super::{create_test_actor, create_test_payment_draft, seed_package, seed_pilgrim};
use crate::{Persistence, PilgrimFilter};

#[test]
fn test_full_profile_round_trip() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    let draft: PilgrimDraft = PilgrimDraft {
        full_name: Some(String::from("Siti Aminah")),
        gender: Some(String::from("F")),
        birth_date: Some(String::from("1975-02-09")),
        phone: Some(String::from("+62811000111")),
        email: Some(String::from("siti@example.com")),
        address: Some(String::from("Jl. Merdeka 1, Jakarta")),
        national_id: Some(String::from("3174000000000001")),
        passport_number: Some(String::from("B1234567")),
        passport_photo_ref: Some(String::from("uploads/passports/siti.jpg")),
        medical_notes: Some(String::from("Hypertension")),
        ..PilgrimDraft::default()
    };
    let created: Pilgrim = registrar
        .register_pilgrim(&create_test_actor(), &draft)
        .unwrap();

    let stored: Pilgrim = persistence
        .get_pilgrim(created.pilgrim_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.profile.gender, Gender::Female);
    assert_eq!(
        stored.profile.birth_date.map(|d| d.to_string()),
        Some(String::from("1975-02-09"))
    );
    assert_eq!(
        stored.profile.passport_photo_ref.as_deref(),
        Some("uploads/passports/siti.jpg")
    );
}

#[test]
fn test_get_missing_records_returns_none() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.get_pilgrim(PilgrimId::new(1)).unwrap().is_none());
    assert!(persistence.get_package(PackageId::new(1)).unwrap().is_none());
}

#[test]
fn test_list_pilgrims_filters() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let package_id: PackageId =
        seed_package(&mut persistence, "UMR-01", 5, 1_000, "2027-01-01", "2027-01-10");
    let on_package: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", Some(package_id));
    let cancelled: PilgrimId = seed_pilgrim(&mut persistence, "2222222222222222", None);
    let deleted: PilgrimId = seed_pilgrim(&mut persistence, "3333333333333333", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    registrar
        .change_status(&create_test_actor(), cancelled, PilgrimStatus::Cancelled, None)
        .unwrap();
    registrar
        .delete_pilgrim(&create_test_actor(), deleted)
        .unwrap();

    let ids = |pilgrims: Vec<Pilgrim>| -> Vec<PilgrimId> {
        pilgrims.into_iter().map(|p| p.pilgrim_id).collect()
    };
    assert_eq!(
        ids(persistence.list_pilgrims(&PilgrimFilter::default()).unwrap()),
        vec![on_package, cancelled]
    );
    assert_eq!(
        ids(persistence
            .list_pilgrims(&PilgrimFilter {
                include_deleted: true,
                ..PilgrimFilter::default()
            })
            .unwrap()),
        vec![on_package, cancelled, deleted]
    );
    assert_eq!(
        ids(persistence
            .list_pilgrims(&PilgrimFilter {
                status: Some(PilgrimStatus::Cancelled),
                ..PilgrimFilter::default()
            })
            .unwrap()),
        vec![cancelled]
    );
    assert_eq!(
        ids(persistence
            .list_pilgrims(&PilgrimFilter {
                package_id: Some(package_id),
                ..PilgrimFilter::default()
            })
            .unwrap()),
        vec![on_package]
    );
}

#[test]
fn test_list_packages_orders_by_departure() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let later: PackageId = seed_package(&mut persistence, "HAJ", 5, 1_000, "2027-05-01", "2027-06-10");
    let earlier: PackageId =
        seed_package(&mut persistence, "UMR", 5, 1_000, "2027-01-01", "2027-01-10");

    let packages: Vec<Package> = persistence.list_packages().unwrap();
    let ids: Vec<PackageId> = packages.iter().map(|p| p.package_id).collect();

    assert_eq!(ids, vec![earlier, later]);
    assert_eq!(packages[0].travel_dates.start().to_string(), "2027-01-01");
}

#[test]
fn test_list_payments_orders_by_date() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let pilgrim_id: PilgrimId = seed_pilgrim(&mut persistence, "1111111111111111", None);

    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(&mut persistence, &sink);
    for (amount, date) in [(300, "2026-12-01"), (100, "2026-10-01"), (200, "2026-11-01")] {
        registrar
            .record_payment(
                &create_test_actor(),
                pilgrim_id,
                &create_test_payment_draft(amount, date),
            )
            .unwrap();
    }

    let payments: Vec<Payment> = persistence.list_payments(pilgrim_id).unwrap();
    let amounts: Vec<i64> = payments.iter().map(|p| p.amount.minor()).collect();

    assert_eq!(amounts, vec![100, 200, 300]);
    assert!(payments.iter().all(|p| p.method == PaymentMethod::Cash));
    assert!(payments.iter().all(|p| p.verified_by.is_none()));
}
