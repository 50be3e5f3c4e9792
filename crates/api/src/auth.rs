// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor identity supplied by the request layer.
//!
//! Authentication happens upstream. This module only checks that the
//! forwarded identity is usable as an audit attribution.

use jamaah_audit::Actor;

use crate::error::ApiError;

/// Longest accepted actor identifier.
pub const MAX_ACTOR_ID_LENGTH: usize = 64;

/// An authenticated staff member performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id }
    }

    /// Builds an actor from the identity forwarded with a request.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the identity is missing, blank,
    /// too long, or contains whitespace or control characters.
    pub fn from_forwarded_id(value: Option<&str>) -> Result<Self, ApiError> {
        let id: &str = value.map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("No actor identity supplied"),
            });
        }
        if id.len() > MAX_ACTOR_ID_LENGTH {
            return Err(ApiError::AuthenticationFailed {
                reason: format!("Actor identity exceeds {MAX_ACTOR_ID_LENGTH} characters"),
            });
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Actor identity contains whitespace"),
            });
        }
        Ok(Self::new(id.to_string()))
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::staff(&self.id)
    }
}
