// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{CoreError, ErrorKind};
use jamaah_domain::{PilgrimId, PilgrimPatch};
use tracing::warn;

/// One failed item of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    /// The id of the item that failed.
    pub item_id: i64,
    /// The stable kind of the failure.
    pub kind: ErrorKind,
    /// A description of the failure.
    pub message: String,
}

/// The outcome of a bulk operation: every item lands in exactly one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome<T> {
    /// Items that succeeded, in request order.
    pub results: Vec<T>,
    /// Items that failed, in request order.
    pub errors: Vec<BulkItemError>,
}

impl<T> BulkOutcome<T> {
    /// Creates an empty outcome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Files one item's result.
    pub fn push(&mut self, item_id: i64, result: Result<T, CoreError>) {
        match result {
            Ok(value) => self.results.push(value),
            Err(err) => {
                warn!(item_id, kind = err.kind().as_str(), error = %err, "Bulk item failed");
                self.errors.push(BulkItemError {
                    item_id,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }
    }
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One item of a bulk pilgrim update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PilgrimUpdate {
    /// The pilgrim to update.
    pub pilgrim_id: PilgrimId,
    /// The changes to apply.
    pub patch: PilgrimPatch,
}
