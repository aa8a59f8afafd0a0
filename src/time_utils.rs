// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date handling and localized rendering.

use chrono::{Datelike, Local, NaiveDate};

/// Today as the server's local calendar day. Used as the default entry date.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Long-form Korean date rendering, e.g. `2024년 3월 1일`.
pub fn format_date_ko(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}
