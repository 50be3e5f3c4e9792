// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{DomainError, IdentityField};
use crate::types::{NationalId, PassportNumber, PilgrimId, PilgrimStatus};

/// A stored pilgrim sharing at least one identity document with a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMatch {
    pub pilgrim_id: PilgrimId,
    pub national_id: Option<NationalId>,
    pub passport_number: Option<PassportNumber>,
    pub status: PilgrimStatus,
}

/// Result of an identity uniqueness lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCheck {
    /// The national ID is held by a non-cancelled pilgrim.
    pub national_id_taken: bool,
    /// The passport number is held by a non-cancelled pilgrim.
    pub passport_taken: bool,
    /// The pilgrim behind the reported conflict.
    pub conflicting_id: Option<PilgrimId>,
    national_id: Option<NationalId>,
    passport_number: Option<PassportNumber>,
    national_id_holder: Option<PilgrimId>,
    passport_holder: Option<PilgrimId>,
    reactivation: Option<(PilgrimId, IdentityField)>,
}

impl IdentityCheck {
    /// Returns the cancelled pilgrim that could be reactivated instead, when
    /// there is no hard conflict.
    #[must_use]
    pub fn reactivation_candidate(&self) -> Option<(PilgrimId, IdentityField)> {
        if self.national_id_taken || self.passport_taken {
            None
        } else {
            self.reactivation
        }
    }

    /// Turns the check into a decision.
    ///
    /// A field held by a non-cancelled pilgrim is a hard duplicate. When the
    /// only matches are cancelled pilgrims the caller is offered reactivation.
    /// National ID is considered before passport number.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNationalId`, `DuplicatePassportNumber` or
    /// `ReactivationCandidate`.
    pub fn ensure_available(&self) -> Result<(), DomainError> {
        if let (Some(national_id), Some(pilgrim_id)) =
            (&self.national_id, self.national_id_holder)
        {
            return Err(DomainError::DuplicateNationalId {
                national_id: national_id.clone(),
                pilgrim_id,
            });
        }
        if let (Some(passport_number), Some(pilgrim_id)) =
            (&self.passport_number, self.passport_holder)
        {
            return Err(DomainError::DuplicatePassportNumber {
                passport_number: passport_number.clone(),
                pilgrim_id,
            });
        }
        if let Some((pilgrim_id, field)) = self.reactivation {
            return Err(DomainError::ReactivationCandidate { pilgrim_id, field });
        }
        Ok(())
    }

    /// Like [`Self::ensure_available`] but ignores cancelled matches.
    ///
    /// Used when reactivating, where the pilgrim's own identity may also sit
    /// on other cancelled records.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNationalId` or `DuplicatePassportNumber`.
    pub fn ensure_not_taken(&self) -> Result<(), DomainError> {
        let hard_only: Self = Self {
            reactivation: None,
            ..self.clone()
        };
        hard_only.ensure_available()
    }
}

/// Assesses identity matches for a candidate's documents.
///
/// `matches` must already exclude deleted pilgrims and the pilgrim being
/// edited, and be ordered by id so the reported conflict is stable.
///
/// # Arguments
///
/// * `national_id` - The candidate's national ID, if checked
/// * `passport_number` - The candidate's passport number, if checked
/// * `matches` - Stored pilgrims sharing either document
#[must_use]
pub fn assess_identity(
    national_id: Option<&NationalId>,
    passport_number: Option<&PassportNumber>,
    matches: &[IdentityMatch],
) -> IdentityCheck {
    let holder_of = |wanted: &dyn Fn(&IdentityMatch) -> bool, live: bool| -> Option<PilgrimId> {
        matches
            .iter()
            .find(|m| wanted(m) && m.status.is_live() == live)
            .map(|m| m.pilgrim_id)
    };
    let nid_matches = |m: &IdentityMatch| national_id.is_some() && m.national_id.as_ref() == national_id;
    let passport_matches =
        |m: &IdentityMatch| passport_number.is_some() && m.passport_number.as_ref() == passport_number;

    let national_id_holder: Option<PilgrimId> = holder_of(&nid_matches, true);
    let passport_holder: Option<PilgrimId> = holder_of(&passport_matches, true);
    let reactivation: Option<(PilgrimId, IdentityField)> = holder_of(&nid_matches, false)
        .map(|id| (id, IdentityField::NationalId))
        .or_else(|| {
            holder_of(&passport_matches, false).map(|id| (id, IdentityField::PassportNumber))
        });

    let conflicting_id: Option<PilgrimId> = national_id_holder
        .or(passport_holder)
        .or(reactivation.map(|(id, _)| id));

    IdentityCheck {
        national_id_taken: national_id_holder.is_some(),
        passport_taken: passport_holder.is_some(),
        conflicting_id,
        national_id: national_id.cloned(),
        passport_number: passport_number.cloned(),
        national_id_holder,
        passport_holder,
        reactivation,
    }
}
