// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod actor;
mod audit_dispatch;
mod error;


use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    routing::{get, post},
};
use clap::Parser;
use jamaah_api::{
    BulkResponse, BulkUpdatePilgrimsRequest, BulkVerifyPaymentsRequest, ChangeStatusRequest,
    DeletePaymentResponse, ListActivityQuery, ListActivityResponse, ListPackagesResponse,
    ListPaymentsResponse, ListPilgrimsQuery, ListPilgrimsResponse, ListRegistrationsResponse,
    MessageResponse, OccupancyResponse, OverlapCheckResponse, PackageInfo, PackageResponse,
    PaymentInfo, PaymentResponse, PilgrimInfo, PilgrimResponse, RegisterPackageRequest,
    RegisterPilgrimResponse, RegistrationChangeResponse,
};
use jamaah_audit::AuditSink;
use jamaah_domain::{PackageDraft, PaymentDraft, PilgrimDraft, PilgrimPatch};
use jamaah_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::actor::RequestActor;
use crate::audit_dispatch::{AUDIT_QUEUE_CAPACITY, audit_channel, run_audit_writer};
use crate::error::HttpError;

/// Jamaah Server - HTTP server for the pilgrim registration ledger
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, one connection shared by every request.
    persistence: Arc<Mutex<Persistence>>,
    /// Where committed operations report their audit events.
    audit: Arc<dyn AuditSink>,
}

type HttpResult<T> = Result<Json<T>, HttpError>;

// ============================================================================
// Pilgrims
// ============================================================================

/// Handler for POST `/pilgrims`.
async fn handle_register_pilgrim(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(draft): Json<PilgrimDraft>,
) -> HttpResult<RegisterPilgrimResponse> {
    info!(actor = %actor.id, "Handling register_pilgrim request");
    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterPilgrimResponse = jamaah_api::register_pilgrim(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        &draft,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/pilgrims`.
async fn handle_list_pilgrims(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListPilgrimsQuery>,
) -> HttpResult<ListPilgrimsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::list_pilgrims(&mut persistence, &query)?))
}

/// Handler for GET `/pilgrims/{pilgrim_id}`.
async fn handle_get_pilgrim(
    AxumState(app_state): AxumState<AppState>,
    Path(pilgrim_id): Path<i64>,
) -> HttpResult<PilgrimInfo> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::get_pilgrim(&mut persistence, pilgrim_id)?))
}

/// Handler for PATCH `/pilgrims/{pilgrim_id}`.
async fn handle_update_pilgrim(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
    Json(patch): Json<PilgrimPatch>,
) -> HttpResult<PilgrimResponse> {
    info!(actor = %actor.id, pilgrim_id, "Handling update_pilgrim request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::update_pilgrim(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
        &patch,
    )?))
}

/// Handler for DELETE `/pilgrims/{pilgrim_id}`.
async fn handle_delete_pilgrim(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
) -> HttpResult<MessageResponse> {
    info!(actor = %actor.id, pilgrim_id, "Handling delete_pilgrim request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::delete_pilgrim(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
    )?))
}

/// Handler for POST `/pilgrims/{pilgrim_id}/status`.
async fn handle_change_status(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
    Json(request): Json<ChangeStatusRequest>,
) -> HttpResult<PilgrimResponse> {
    info!(
        actor = %actor.id,
        pilgrim_id,
        status = %request.status,
        "Handling change_status request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::change_status(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
        &request,
    )?))
}

/// Handler for POST `/pilgrims/{pilgrim_id}/reactivate`.
async fn handle_reactivate_pilgrim(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
) -> HttpResult<PilgrimResponse> {
    info!(actor = %actor.id, pilgrim_id, "Handling reactivate_pilgrim request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::reactivate_pilgrim(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
    )?))
}

/// Handler for POST `/pilgrims/bulk_update`.
async fn handle_bulk_update_pilgrims(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(request): Json<BulkUpdatePilgrimsRequest>,
) -> HttpResult<BulkResponse<PilgrimInfo>> {
    info!(
        actor = %actor.id,
        items = request.updates.len(),
        "Handling bulk_update_pilgrims request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::bulk_update_pilgrims(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        &request,
    )?))
}

// ============================================================================
// Multi-package registrations
// ============================================================================

/// Handler for GET `/pilgrims/{pilgrim_id}/registrations`.
async fn handle_list_registrations(
    AxumState(app_state): AxumState<AppState>,
    Path(pilgrim_id): Path<i64>,
) -> HttpResult<ListRegistrationsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::list_registrations(
        &mut persistence,
        pilgrim_id,
    )?))
}

/// Handler for POST `/pilgrims/{pilgrim_id}/registrations`.
async fn handle_register_package(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
    Json(request): Json<RegisterPackageRequest>,
) -> HttpResult<RegistrationChangeResponse> {
    info!(
        actor = %actor.id,
        pilgrim_id,
        package_id = request.package_id,
        "Handling register_package request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::register_package(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
        request,
    )?))
}

/// Handler for DELETE `/pilgrims/{pilgrim_id}/registrations/{package_id}`.
async fn handle_unregister_package(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((pilgrim_id, package_id)): Path<(i64, i64)>,
) -> HttpResult<RegistrationChangeResponse> {
    info!(
        actor = %actor.id,
        pilgrim_id,
        package_id,
        "Handling unregister_package request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::unregister_package(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
        package_id,
    )?))
}

/// Handler for GET `/pilgrims/{pilgrim_id}/overlap/{package_id}`.
async fn handle_check_overlap(
    AxumState(app_state): AxumState<AppState>,
    Path((pilgrim_id, package_id)): Path<(i64, i64)>,
) -> HttpResult<OverlapCheckResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::check_overlap(
        &mut persistence,
        app_state.audit.as_ref(),
        pilgrim_id,
        package_id,
    )?))
}

// ============================================================================
// Payments
// ============================================================================

/// Handler for GET `/pilgrims/{pilgrim_id}/payments`.
async fn handle_list_payments(
    AxumState(app_state): AxumState<AppState>,
    Path(pilgrim_id): Path<i64>,
) -> HttpResult<ListPaymentsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::list_payments(&mut persistence, pilgrim_id)?))
}

/// Handler for POST `/pilgrims/{pilgrim_id}/payments`.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pilgrim_id): Path<i64>,
    Json(draft): Json<PaymentDraft>,
) -> HttpResult<PaymentResponse> {
    info!(actor = %actor.id, pilgrim_id, "Handling record_payment request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::record_payment(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        pilgrim_id,
        &draft,
    )?))
}

/// Handler for PUT `/payments/{payment_id}`.
async fn handle_update_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(payment_id): Path<i64>,
    Json(draft): Json<PaymentDraft>,
) -> HttpResult<PaymentResponse> {
    info!(actor = %actor.id, payment_id, "Handling update_payment request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::update_payment(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        payment_id,
        &draft,
    )?))
}

/// Handler for DELETE `/payments/{payment_id}`.
async fn handle_delete_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(payment_id): Path<i64>,
) -> HttpResult<DeletePaymentResponse> {
    info!(actor = %actor.id, payment_id, "Handling delete_payment request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::delete_payment(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        payment_id,
    )?))
}

/// Handler for POST `/payments/{payment_id}/verify`.
async fn handle_verify_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(payment_id): Path<i64>,
) -> HttpResult<PaymentInfo> {
    info!(actor = %actor.id, payment_id, "Handling verify_payment request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::verify_payment(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        payment_id,
    )?))
}

/// Handler for POST `/payments/bulk_verify`.
async fn handle_bulk_verify_payments(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(request): Json<BulkVerifyPaymentsRequest>,
) -> HttpResult<BulkResponse<PaymentInfo>> {
    info!(
        actor = %actor.id,
        items = request.payment_ids.len(),
        "Handling bulk_verify_payments request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::bulk_verify_payments(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        &request,
    )?))
}

// ============================================================================
// Packages
// ============================================================================

/// Handler for POST `/packages`.
async fn handle_create_package(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(draft): Json<PackageDraft>,
) -> HttpResult<PackageResponse> {
    info!(actor = %actor.id, "Handling create_package request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::create_package(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        &draft,
    )?))
}

/// Handler for GET `/packages`.
async fn handle_list_packages(
    AxumState(app_state): AxumState<AppState>,
) -> HttpResult<ListPackagesResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::list_packages(&mut persistence)?))
}

/// Handler for GET `/packages/{package_id}`.
async fn handle_get_package(
    AxumState(app_state): AxumState<AppState>,
    Path(package_id): Path<i64>,
) -> HttpResult<PackageInfo> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::get_package(&mut persistence, package_id)?))
}

/// Handler for PUT `/packages/{package_id}`.
async fn handle_update_package(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(package_id): Path<i64>,
    Json(draft): Json<PackageDraft>,
) -> HttpResult<PackageResponse> {
    info!(actor = %actor.id, package_id, "Handling update_package request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::update_package(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        package_id,
        &draft,
    )?))
}

/// Handler for DELETE `/packages/{package_id}`.
async fn handle_delete_package(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(package_id): Path<i64>,
) -> HttpResult<MessageResponse> {
    info!(actor = %actor.id, package_id, "Handling delete_package request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::delete_package(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        package_id,
    )?))
}

/// Handler for POST `/packages/{package_id}/recompute`.
async fn handle_recompute_capacity(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(package_id): Path<i64>,
) -> HttpResult<PackageResponse> {
    info!(actor = %actor.id, package_id, "Handling recompute_capacity request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::recompute_capacity(
        &mut persistence,
        app_state.audit.as_ref(),
        &actor,
        package_id,
    )?))
}

/// Handler for GET `/packages/{package_id}/occupancy`.
async fn handle_registration_occupancy(
    AxumState(app_state): AxumState<AppState>,
    Path(package_id): Path<i64>,
) -> HttpResult<OccupancyResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::registration_occupancy(
        &mut persistence,
        app_state.audit.as_ref(),
        package_id,
    )?))
}

// ============================================================================
// Activity log
// ============================================================================

/// Handler for GET `/activity`.
async fn handle_list_activity(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListActivityQuery>,
) -> HttpResult<ListActivityResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(jamaah_api::list_activity(&mut persistence, &query)?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/pilgrims",
            post(handle_register_pilgrim).get(handle_list_pilgrims),
        )
        .route("/pilgrims/bulk_update", post(handle_bulk_update_pilgrims))
        .route(
            "/pilgrims/{pilgrim_id}",
            get(handle_get_pilgrim)
                .patch(handle_update_pilgrim)
                .delete(handle_delete_pilgrim),
        )
        .route("/pilgrims/{pilgrim_id}/status", post(handle_change_status))
        .route(
            "/pilgrims/{pilgrim_id}/reactivate",
            post(handle_reactivate_pilgrim),
        )
        .route(
            "/pilgrims/{pilgrim_id}/registrations",
            get(handle_list_registrations).post(handle_register_package),
        )
        .route(
            "/pilgrims/{pilgrim_id}/registrations/{package_id}",
            axum::routing::delete(handle_unregister_package),
        )
        .route(
            "/pilgrims/{pilgrim_id}/overlap/{package_id}",
            get(handle_check_overlap),
        )
        .route(
            "/pilgrims/{pilgrim_id}/payments",
            get(handle_list_payments).post(handle_record_payment),
        )
        .route("/payments/bulk_verify", post(handle_bulk_verify_payments))
        .route(
            "/payments/{payment_id}",
            axum::routing::put(handle_update_payment).delete(handle_delete_payment),
        )
        .route("/payments/{payment_id}/verify", post(handle_verify_payment))
        .route(
            "/packages",
            post(handle_create_package).get(handle_list_packages),
        )
        .route(
            "/packages/{package_id}",
            get(handle_get_package)
                .put(handle_update_package)
                .delete(handle_delete_package),
        )
        .route(
            "/packages/{package_id}/recompute",
            post(handle_recompute_capacity),
        )
        .route(
            "/packages/{package_id}/occupancy",
            get(handle_registration_occupancy),
        )
        .route("/activity", get(handle_list_activity))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Jamaah Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));

    let (audit_sink, audit_receiver) = audit_channel(AUDIT_QUEUE_CAPACITY);
    tokio::spawn(run_audit_writer(audit_receiver, Arc::clone(&persistence)));

    let app_state: AppState = AppState {
        persistence,
        audit: Arc::new(audit_sink),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
