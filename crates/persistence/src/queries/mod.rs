// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `pilgrims`: pilgrim lookups, identity matches and seat counts
//! - `packages`: package lookups
//! - `registrations`: multi-package bookings
//! - `payments`: payment lookups and sums
//! - `activity`: the activity log

pub mod activity;
pub mod packages;
pub mod payments;
pub mod pilgrims;
pub mod registrations;
