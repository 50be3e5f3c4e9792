// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for state-changing routes.
//!
//! Authentication is performed by whatever sits in front of this server.
//! It forwards the staff identity in the `x-actor-id` header, which this
//! extractor validates and turns into an [`AuthenticatedActor`].

use axum::{extract::FromRequestParts, http::request::Parts};
use jamaah_api::{ApiError, AuthenticatedActor};
use tracing::{debug, warn};

use crate::error::HttpError;

/// Header carrying the forwarded staff identity.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for the staff member performing a request.
pub struct RequestActor(pub AuthenticatedActor);

impl<S: Send + Sync> FromRequestParts<S> for RequestActor {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header: Option<&str> = parts
            .headers
            .get(ACTOR_HEADER)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| {
                warn!("Actor header is not valid ASCII");
                HttpError::from(ApiError::AuthenticationFailed {
                    reason: String::from("Actor identity is not valid ASCII"),
                })
            })?;

        let actor: AuthenticatedActor =
            AuthenticatedActor::from_forwarded_id(header).map_err(|e| {
                debug!(error = %e, "Rejected request actor");
                HttpError::from(e)
            })?;
        Ok(Self(actor))
    }
}
