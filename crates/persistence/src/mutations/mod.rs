// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! These functions perform single statements and assume the caller holds
//! the transaction. Invariants spanning several tables are enforced by the
//! engine in `jamaah-core`, not here.

pub mod activity;
pub mod packages;
pub mod payments;
pub mod pilgrims;
pub mod registrations;
