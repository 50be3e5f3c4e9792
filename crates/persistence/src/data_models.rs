// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversion into domain values.

use std::str::FromStr;

use diesel::prelude::*;
use jamaah_domain::{
    DateRange, DomainError, Gender, Money, NationalId, Package, PackageId, PassportNumber,
    Payment, PaymentId, PaymentMethod, PaymentStatus, Pilgrim, PilgrimId, PilgrimProfile,
    PilgrimStatus, Registration, RegistrationId, RegistrationStatus, parse_date,
};
use num_traits::ToPrimitive;

use crate::diesel_schema::{activity_logs, package_registrations, packages, payments, pilgrims};
use crate::error::PersistenceError;

/// A row of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogEntry {
    pub log_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = pilgrims)]
pub struct PilgrimRow {
    pub pilgrim_id: i64,
    pub full_name: String,
    pub gender: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub passport_number: Option<String>,
    pub passport_photo_ref: Option<String>,
    pub medical_notes: Option<String>,
    pub status: String,
    pub status_notes: Option<String>,
    pub is_deleted: i32,
    pub deleted_at: Option<String>,
    pub package_id: Option<i64>,
    pub total_paid: i64,
    pub remaining_balance: i64,
    pub payment_status: String,
    pub created_by: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = packages)]
pub struct PackageRow {
    pub package_id: i64,
    pub code: String,
    pub name: String,
    pub price: i64,
    pub total_capacity: i32,
    pub occupied_seats: i32,
    pub departure_date: String,
    pub return_date: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = package_registrations)]
pub struct RegistrationRow {
    pub registration_id: i64,
    pub pilgrim_id: i64,
    pub package_id: i64,
    pub status: String,
    pub created_by: String,
    pub created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = payments)]
pub struct PaymentRow {
    pub payment_id: i64,
    pub pilgrim_id: i64,
    pub amount: i64,
    pub payment_date: String,
    pub method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub receipt_ref: Option<String>,
    pub created_by: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = activity_logs)]
pub struct ActivityLogRow {
    pub log_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: String,
}

fn invalid(table: &'static str) -> impl Fn(DomainError) -> PersistenceError {
    move |err: DomainError| PersistenceError::InvalidRow {
        table,
        reason: err.to_string(),
    }
}

fn seat_count(table: &'static str, value: i32) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| PersistenceError::InvalidRow {
        table,
        reason: format!("negative seat count {value}"),
    })
}

impl TryFrom<PilgrimRow> for Pilgrim {
    type Error = PersistenceError;

    fn try_from(row: PilgrimRow) -> Result<Self, Self::Error> {
        let to_domain = invalid("pilgrims");
        let profile: PilgrimProfile = PilgrimProfile {
            full_name: row.full_name,
            gender: Gender::from_str(&row.gender).map_err(&to_domain)?,
            birth_date: row
                .birth_date
                .as_deref()
                .map(|v| parse_date("birth_date", v))
                .transpose()
                .map_err(&to_domain)?,
            phone: row.phone,
            email: row.email,
            address: row.address,
            national_id: row
                .national_id
                .as_deref()
                .map(NationalId::parse)
                .transpose()
                .map_err(&to_domain)?,
            passport_number: row
                .passport_number
                .as_deref()
                .map(PassportNumber::parse)
                .transpose()
                .map_err(&to_domain)?,
            passport_photo_ref: row.passport_photo_ref,
            medical_notes: row.medical_notes,
        };
        Ok(Self {
            pilgrim_id: PilgrimId::new(row.pilgrim_id),
            profile,
            status: PilgrimStatus::from_str(&row.status).map_err(&to_domain)?,
            status_notes: row.status_notes,
            deleted: row.is_deleted != 0,
            deleted_at: row.deleted_at,
            package_id: row.package_id.map(PackageId::new),
            total_paid: Money::from_minor(row.total_paid),
            remaining_balance: Money::from_minor(row.remaining_balance),
            payment_status: PaymentStatus::from_str(&row.payment_status).map_err(&to_domain)?,
            created_by: row.created_by,
        })
    }
}

impl TryFrom<PackageRow> for Package {
    type Error = PersistenceError;

    fn try_from(row: PackageRow) -> Result<Self, Self::Error> {
        let to_domain = invalid("packages");
        let travel_dates: DateRange = DateRange::new(
            parse_date("departure_date", &row.departure_date).map_err(&to_domain)?,
            parse_date("return_date", &row.return_date).map_err(&to_domain)?,
        )
        .map_err(&to_domain)?;
        Ok(Self {
            package_id: PackageId::new(row.package_id),
            code: row.code,
            name: row.name,
            price: Money::from_minor(row.price),
            total_capacity: seat_count("packages", row.total_capacity)?,
            occupied_seats: seat_count("packages", row.occupied_seats)?,
            travel_dates,
        })
    }
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = PersistenceError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            registration_id: RegistrationId::new(row.registration_id),
            pilgrim_id: PilgrimId::new(row.pilgrim_id),
            package_id: PackageId::new(row.package_id),
            status: RegistrationStatus::from_str(&row.status)
                .map_err(invalid("package_registrations"))?,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<PaymentRow> for Payment {
    type Error = PersistenceError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let to_domain = invalid("payments");
        Ok(Self {
            payment_id: PaymentId::new(row.payment_id),
            pilgrim_id: PilgrimId::new(row.pilgrim_id),
            amount: Money::from_minor(row.amount),
            payment_date: parse_date("payment_date", &row.payment_date).map_err(&to_domain)?,
            method: PaymentMethod::from_str(&row.method).map_err(&to_domain)?,
            reference_number: row.reference_number,
            notes: row.notes,
            receipt_ref: row.receipt_ref,
            created_by: row.created_by,
            verified_by: row.verified_by,
            verified_at: row.verified_at,
        })
    }
}

impl From<ActivityLogRow> for ActivityLogEntry {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            log_id: row.log_id,
            actor_id: row.actor_id,
            actor_type: row.actor_type,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            action: row.action,
            details: row.details,
            created_at: row.created_at,
        }
    }
}
