// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jamaah_api::ApiError;
use jamaah_core::ErrorKind;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Stable error kind.
    pub error_kind: String,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The stable error kind.
    pub kind: ErrorKind,
    /// The error message.
    pub message: String,
}

/// Maps an error kind to its HTTP status.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateIdentity
        | ErrorKind::ReactivationCandidate
        | ErrorKind::PackageInUse => StatusCode::CONFLICT,
        ErrorKind::OverlapConflict
        | ErrorKind::CapacityExceeded
        | ErrorKind::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            error_kind: self.kind.as_str().to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let kind: ErrorKind = err.kind();
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => status_for(kind),
        };
        Self {
            status,
            kind,
            message: err.to_string(),
        }
    }
}
