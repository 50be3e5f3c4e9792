// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Asynchronous delivery of audit events to the activity log.
//!
//! The engine records events synchronously while the request still holds
//! the persistence lock, so the sink only queues them. A background task
//! drains the queue and writes each event once the lock is free.

use std::sync::Arc;

use jamaah_audit::{AuditError, AuditEvent, AuditSink};
use jamaah_persistence::Persistence;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Events buffered before the sink starts refusing new ones.
pub const AUDIT_QUEUE_CAPACITY: usize = 1024;

/// An [`AuditSink`] that forwards events into a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    sender: mpsc::Sender<AuditEvent>,
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.sender.try_send(event.clone()).map_err(|err| match err {
            mpsc::error::TrySendError::Closed(_) => AuditError::Closed,
            mpsc::error::TrySendError::Full(_) => {
                AuditError::Failed(String::from("audit queue is full"))
            }
        })
    }
}

/// Creates a sink and the receiver its events arrive on.
#[must_use]
pub fn audit_channel(capacity: usize) -> (ChannelAuditSink, mpsc::Receiver<AuditEvent>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (ChannelAuditSink { sender }, receiver)
}

/// Persists queued events until every sender is dropped.
pub async fn run_audit_writer(
    mut receiver: mpsc::Receiver<AuditEvent>,
    persistence: Arc<Mutex<Persistence>>,
) {
    while let Some(event) = receiver.recv().await {
        let mut store = persistence.lock().await;
        match store.persist_audit_event(&event) {
            Ok(log_id) => debug!(
                log_id,
                action = %event.action.name,
                entity_id = event.entity_id,
                "Persisted audit event"
            ),
            Err(e) => warn!(
                error = %e,
                action = %event.action.name,
                "Failed to persist audit event"
            ),
        }
    }
    info!("Audit writer stopped");
}
