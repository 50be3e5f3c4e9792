// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use jamaah_audit::{AuditError, AuditEvent, AuditSink};
use jamaah_domain::{PackageDraft, PaymentDraft, PilgrimDraft};
use jamaah_persistence::Persistence;

use crate::{AuthenticatedActor, PackageResponse, create_package};

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

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_pilgrim_draft(name: &str, national_id: &str) -> PilgrimDraft {
    PilgrimDraft {
        full_name: Some(name.to_string()),
        gender: Some(String::from("M")),
        national_id: Some(national_id.to_string()),
        ..PilgrimDraft::default()
    }
}

pub fn create_package_draft(
    code: &str,
    capacity: i64,
    departure: &str,
    return_date: &str,
) -> PackageDraft {
    PackageDraft {
        code: Some(code.to_string()),
        name: Some(format!("Umrah {code}")),
        price: Some(30_000_000),
        total_capacity: Some(capacity),
        departure_date: Some(departure.to_string()),
        return_date: Some(return_date.to_string()),
    }
}

pub fn create_payment_draft(amount: i64, payment_date: &str) -> PaymentDraft {
    PaymentDraft {
        amount: Some(amount),
        payment_date: Some(payment_date.to_string()),
        method: Some(String::from("transfer")),
        ..PaymentDraft::default()
    }
}

/// Creates a package through the API and returns its id.
pub fn seed_package(
    persistence: &mut Persistence,
    audit: &dyn AuditSink,
    code: &str,
    capacity: i64,
    departure: &str,
    return_date: &str,
) -> i64 {
    let response: PackageResponse = create_package(
        persistence,
        audit,
        &create_test_admin(),
        &create_package_draft(code, capacity, departure, return_date),
    )
    .unwrap();
    response.package.package_id
}
