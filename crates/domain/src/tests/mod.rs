// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::{DateRange, PilgrimDraft};
use time::Date;
use time::macros::date;

pub fn create_test_range(start: Date, end: Date) -> DateRange {
    DateRange::new(start, end).unwrap()
}

pub fn january_trip() -> DateRange {
    create_test_range(date!(2027 - 01 - 01), date!(2027 - 01 - 14))
}

pub fn create_test_draft() -> PilgrimDraft {
    PilgrimDraft {
        full_name: Some(String::from("Siti Aminah")),
        gender: Some(String::from("F")),
        birth_date: Some(String::from("1975-04-02")),
        phone: Some(String::from("+62811000111")),
        email: Some(String::from("siti@example.id")),
        national_id: Some(String::from("3174012345678901")),
        ..PilgrimDraft::default()
    }
}
