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
    clippy::all
)]

mod sink;

#[cfg(test)]
mod tests;

pub use sink::{AuditError, AuditSink, NullAuditSink, TracingAuditSink};

/// Represents the entity performing an action.
///
/// An actor is the already-authenticated staff member (or system process)
/// on whose behalf the engine runs an operation. Its id is what lands in
/// `created_by` and `verified_by` stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "staff", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates a staff actor.
    #[must_use]
    pub fn staff(id: &str) -> Self {
        Self::new(id.to_string(), String::from("staff"))
    }
}

/// The kind of record an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// A pilgrim record.
    Pilgrim,
    /// A travel package.
    Package,
    /// A multi-package registration.
    Registration,
    /// A payment.
    Payment,
}

impl EntityType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pilgrim => "pilgrim",
            Self::Package => "package",
            Self::Registration => "registration",
            Self::Payment => "payment",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`RegisterPilgrim`", "`RecordPayment`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A committed state change, reported after the transaction that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The kind of record changed.
    pub entity_type: EntityType,
    /// The id of the record changed.
    pub entity_id: i64,
    /// The action that was performed.
    pub action: Action,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `entity_type` - The kind of record changed
    /// * `entity_id` - The id of the record changed
    /// * `action` - The action that was performed
    #[must_use]
    pub const fn new(actor: Actor, entity_type: EntityType, entity_id: i64, action: Action) -> Self {
        Self {
            actor,
            entity_type,
            entity_id,
            action,
        }
    }
}
