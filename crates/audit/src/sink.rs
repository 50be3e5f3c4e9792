// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::AuditEvent;
use tracing::info;

/// Errors a sink may report. Callers log them and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The receiving side of the sink has gone away.
    Closed,
    /// The sink failed for another reason.
    Failed(String),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Audit sink is closed"),
            Self::Failed(msg) => write!(f, "Audit sink failed: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}

/// Receives audit events after the owning transaction has committed.
///
/// Delivery is fire-and-forget: an error returned here is never allowed to
/// undo the operation that produced the event.
pub trait AuditSink: Send + Sync {
    /// Records one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be handed off.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Writes each event as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        info!(
            entity_type = event.entity_type.as_str(),
            entity_id = event.entity_id,
            action = %event.action.name,
            actor = %event.actor.id,
            details = event.action.details.as_deref().unwrap_or(""),
            "Audit event"
        );
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}
