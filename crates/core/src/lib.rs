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

mod bulk;
pub mod capacity;
mod error;
pub mod identity;
pub mod overlap;
pub mod payments;
mod registrar;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use bulk::{BulkItemError, BulkOutcome, PilgrimUpdate};
pub use capacity::{RegistrationOccupancy, SeatCount};
pub use error::{CoreError, ErrorKind, StoreError};
pub use payments::PaymentSummary;
pub use registrar::{RecordedPayment, RegisteredPilgrim, Registrar};
pub use store::{NewPilgrim, Store, Transaction};
