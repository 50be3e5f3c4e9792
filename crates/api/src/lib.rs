// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request boundary of the pilgrim registration engine.
//!
//! Handlers translate request payloads into engine operations, run them
//! against a [`jamaah_persistence::Persistence`] handle and translate the
//! outcome into serializable responses. Engine and domain errors never
//! cross this boundary untranslated: every failure leaves as an
//! [`ApiError`] carrying a stable [`jamaah_core::ErrorKind`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, MAX_ACTOR_ID_LENGTH};
pub use error::{ApiError, BulkRequestError, translate_core_error, translate_domain_error};
pub use handlers::{
    MAX_ACTIVITY_LIMIT, MAX_BULK_ITEMS, bulk_update_pilgrims, bulk_verify_payments, change_status,
    check_overlap, create_package, delete_package, delete_payment, delete_pilgrim, get_package,
    get_pilgrim, list_activity, list_packages, list_payments, list_pilgrims, list_registrations,
    reactivate_pilgrim, record_payment, recompute_capacity, register_package, register_pilgrim,
    registration_occupancy, unregister_package, update_package, update_payment, update_pilgrim,
    validate_batch, verify_payment,
};
pub use request_response::{
    ActivityLogInfo, BulkItemErrorInfo, BulkResponse, BulkUpdatePilgrimsRequest,
    BulkVerifyPaymentsRequest, ChangeStatusRequest, DeletePaymentResponse, ListActivityQuery,
    ListActivityResponse, ListPackagesResponse, ListPaymentsResponse, ListPilgrimsQuery,
    ListPilgrimsResponse, ListRegistrationsResponse, MessageResponse, OccupancyResponse,
    OverlapCheckResponse, PackageInfo, PackageResponse, PaymentInfo, PaymentResponse,
    PaymentSummaryInfo, PilgrimInfo, PilgrimResponse, PilgrimUpdateRequest,
    RegisterPackageRequest, RegisterPilgrimResponse, RegistrationChangeResponse,
    RegistrationInfo,
};
