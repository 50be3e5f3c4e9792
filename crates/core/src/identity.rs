// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::Transaction;
use jamaah_domain::{
    IdentityCheck, IdentityMatch, NationalId, PassportNumber, PilgrimId, assess_identity,
};
use tracing::debug;

/// Looks up who else holds the given identity documents.
///
/// Read-only. Deleted pilgrims and `exclude` are ignored.
///
/// # Arguments
///
/// * `tx` - The open transaction
/// * `national_id` - National ID to check, if any
/// * `passport_number` - Passport number to check, if any
/// * `exclude` - The pilgrim being edited
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn check_unique(
    tx: &mut dyn Transaction,
    national_id: Option<&NationalId>,
    passport_number: Option<&PassportNumber>,
    exclude: Option<PilgrimId>,
) -> Result<IdentityCheck, CoreError> {
    if national_id.is_none() && passport_number.is_none() {
        return Ok(assess_identity(None, None, &[]));
    }
    let matches: Vec<IdentityMatch> =
        tx.find_identity_matches(national_id, passport_number, exclude)?;
    let check: IdentityCheck = assess_identity(national_id, passport_number, &matches);
    debug!(
        national_id_taken = check.national_id_taken,
        passport_taken = check.passport_taken,
        conflicting_id = check.conflicting_id.map(|id| id.value()),
        "Identity check"
    );
    Ok(check)
}

/// Fails unless the documents are free, offering reactivation when the only
/// holders are cancelled pilgrims.
///
/// # Errors
///
/// Returns `DuplicateNationalId`, `DuplicatePassportNumber`,
/// `ReactivationCandidate`, or a store error.
pub fn ensure_available(
    tx: &mut dyn Transaction,
    national_id: Option<&NationalId>,
    passport_number: Option<&PassportNumber>,
    exclude: Option<PilgrimId>,
) -> Result<(), CoreError> {
    check_unique(tx, national_id, passport_number, exclude)?.ensure_available()?;
    Ok(())
}

/// Fails only when a live pilgrim holds one of the documents.
///
/// # Errors
///
/// Returns `DuplicateNationalId`, `DuplicatePassportNumber`, or a store error.
pub fn ensure_not_taken(
    tx: &mut dyn Transaction,
    national_id: Option<&NationalId>,
    passport_number: Option<&PassportNumber>,
    exclude: Option<PilgrimId>,
) -> Result<(), CoreError> {
    check_unique(tx, national_id, passport_number, exclude)?.ensure_not_taken()?;
    Ok(())
}
