// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OLE Automation dates, as returned for next-run times

use chrono::{NaiveDate, NaiveDateTime};

/// Largest date the format can express (9999-12-31)
const MAX_DAYS: f64 = 2_958_465.0;

/// Convert an OLE date (days since 1899-12-30, fraction is time of day).
///
/// Zero and negative values mean "no time" and map to `None`.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn from_ole_date(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() || value <= 0.0 || value >= MAX_DAYS + 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc();
    let seconds = ((value - days) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(chrono::Duration::days(days as i64))?
        .checked_add_signed(chrono::Duration::seconds(seconds))
}
