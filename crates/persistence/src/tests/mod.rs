// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod query_tests;
mod registrar_tests;

use jamaah_audit::{Actor, NullAuditSink};
use jamaah_core::Registrar;
use jamaah_domain::{PackageDraft, PackageId, PaymentDraft, PilgrimDraft, PilgrimId};

use crate::Persistence;

pub fn create_test_actor() -> Actor {
    Actor::staff("admin-123")
}

pub fn create_test_pilgrim_draft(name: &str, national_id: &str) -> PilgrimDraft {
    PilgrimDraft {
        full_name: Some(name.to_string()),
        gender: Some(String::from("F")),
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

pub fn create_test_payment_draft(amount: i64, payment_date: &str) -> PaymentDraft {
    PaymentDraft {
        amount: Some(amount),
        payment_date: Some(payment_date.to_string()),
        method: Some(String::from("cash")),
        ..PaymentDraft::default()
    }
}

/// Creates a package through the registrar and returns its id.
pub fn seed_package(
    persistence: &mut Persistence,
    code: &str,
    capacity: i64,
    price: i64,
    departure: &str,
    return_date: &str,
) -> PackageId {
    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(persistence, &sink);
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
    persistence: &mut Persistence,
    national_id: &str,
    package_id: Option<PackageId>,
) -> PilgrimId {
    let sink: NullAuditSink = NullAuditSink;
    let mut registrar: Registrar<'_, Persistence> = Registrar::new(persistence, &sink);
    let draft: PilgrimDraft = PilgrimDraft {
        package_id: package_id.map(|id| id.value()),
        ..create_test_pilgrim_draft("Test Pilgrim", national_id)
    };
    registrar
        .register_pilgrim(&create_test_actor(), &draft)
        .unwrap()
        .pilgrim_id
}

/// Returns the stored seat counter of a package.
pub fn occupied_seats(persistence: &mut Persistence, package_id: PackageId) -> u32 {
    persistence
        .get_package(package_id)
        .unwrap()
        .unwrap()
        .occupied_seats
}
