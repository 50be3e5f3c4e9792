// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jamaah_audit::NullAuditSink;
use jamaah_core::ErrorKind;
use jamaah_domain::PilgrimDraft;
use jamaah_persistence::Persistence;

use crate::{
    ApiError, DeletePaymentResponse, ListPaymentsResponse, PaymentInfo, PaymentResponse,
    PilgrimInfo, RegisterPilgrimResponse, delete_payment, get_pilgrim, list_payments,
    record_payment, register_pilgrim, update_payment, verify_payment,
};

use super::helpers::{
    create_payment_draft, create_pilgrim_draft, create_test_admin, create_test_persistence,
    seed_package,
};

fn seed_priced_pilgrim(persistence: &mut Persistence, national_id: &str) -> i64 {
    let sink: NullAuditSink = NullAuditSink;
    let package_id: i64 = seed_package(persistence, &sink, "UMR-PAY", 10, "2026-03-01", "2026-03-12");
    let draft: PilgrimDraft = PilgrimDraft {
        package_id: Some(package_id),
        ..create_pilgrim_draft("Payer", national_id)
    };
    let response: RegisterPilgrimResponse =
        register_pilgrim(persistence, &sink, &create_test_admin(), &draft).unwrap();
    response.pilgrim.pilgrim_id
}

#[test]
fn test_record_payment_returns_recalculated_summary() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010101");

    let response: PaymentResponse = record_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        pilgrim_id,
        &create_payment_draft(10_000_000, "2026-01-10"),
    )
    .unwrap();

    assert_eq!(response.payment.amount, 10_000_000);
    assert_eq!(response.payment.payment_date, "2026-01-10");
    assert_eq!(response.payment.method, "transfer");
    assert_eq!(response.summary.total_paid, 10_000_000);
    assert_eq!(response.summary.remaining_balance, 20_000_000);
    assert_eq!(response.summary.payment_status, "partial");
}

#[test]
fn test_payments_that_cover_the_price_mark_pilgrim_paid() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010102");

    for (amount, date) in [(10_000_000, "2026-01-10"), (20_000_000, "2026-02-10")] {
        record_payment(
            &mut persistence,
            &sink,
            &create_test_admin(),
            pilgrim_id,
            &create_payment_draft(amount, date),
        )
        .unwrap();
    }
    let pilgrim: PilgrimInfo = get_pilgrim(&mut persistence, pilgrim_id).unwrap();

    assert_eq!(pilgrim.total_paid, 30_000_000);
    assert_eq!(pilgrim.remaining_balance, 0);
    assert_eq!(pilgrim.payment_status, "paid");
}

#[test]
fn test_record_payment_negative_amount_is_invalid() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010103");

    let err: ApiError = record_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        pilgrim_id,
        &create_payment_draft(-5, "2026-01-10"),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "amount"));
}

#[test]
fn test_record_payment_for_unknown_pilgrim_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;

    let err: ApiError = record_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        4_242,
        &create_payment_draft(1_000, "2026-01-10"),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_update_and_delete_payment_keep_summary_consistent() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010104");
    let recorded: PaymentResponse = record_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        pilgrim_id,
        &create_payment_draft(10_000_000, "2026-01-10"),
    )
    .unwrap();
    let payment_id: i64 = recorded.payment.payment_id;

    let updated: PaymentResponse = update_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        payment_id,
        &create_payment_draft(30_000_000, "2026-01-11"),
    )
    .unwrap();
    let deleted: DeletePaymentResponse =
        delete_payment(&mut persistence, &sink, &create_test_admin(), payment_id).unwrap();

    assert_eq!(updated.summary.payment_status, "paid");
    assert_eq!(updated.payment.payment_date, "2026-01-11");
    assert_eq!(deleted.payment_id, payment_id);
    assert_eq!(deleted.summary.total_paid, 0);
    assert_eq!(deleted.summary.remaining_balance, 30_000_000);
    assert_eq!(deleted.summary.payment_status, "unpaid");
}

#[test]
fn test_verify_payment_stamps_the_actor() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010105");
    let recorded: PaymentResponse = record_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        pilgrim_id,
        &create_payment_draft(5_000_000, "2026-01-10"),
    )
    .unwrap();

    let verified: PaymentInfo = verify_payment(
        &mut persistence,
        &sink,
        &create_test_admin(),
        recorded.payment.payment_id,
    )
    .unwrap();

    assert_eq!(verified.verified_by.as_deref(), Some("admin-123"));
    assert!(verified.verified_at.is_some());
}

#[test]
fn test_list_payments_orders_by_payment_date() {
    let mut persistence: Persistence = create_test_persistence();
    let sink: NullAuditSink = NullAuditSink;
    let pilgrim_id: i64 = seed_priced_pilgrim(&mut persistence, "3201010101010106");
    for (amount, date) in [(2_000, "2026-02-01"), (1_000, "2026-01-01")] {
        record_payment(
            &mut persistence,
            &sink,
            &create_test_admin(),
            pilgrim_id,
            &create_payment_draft(amount, date),
        )
        .unwrap();
    }

    let response: ListPaymentsResponse = list_payments(&mut persistence, pilgrim_id).unwrap();

    let dates: Vec<&str> = response
        .payments
        .iter()
        .map(|p| p.payment_date.as_str())
        .collect();
    assert_eq!(dates, vec!["2026-01-01", "2026-02-01"]);
}

#[test]
fn test_list_payments_for_unknown_pilgrim_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let err: ApiError = list_payments(&mut persistence, 77).unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}
