// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Case records as supplied by the catalog.
//!
//! A [`CaseRecord`] is immutable for the lifetime of a session. The helpers
//! here are presentation-side formatting only; the ledger never looks at them.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use claim_tally::{CaseId, CaseRecord};
//! use rust_decimal_macros::dec;
//!
//! let record = CaseRecord {
//!     id: CaseId(1),
//!     name: "Bottled Water Settlement".to_string(),
//!     description: "Purchased bottled water between 2019 and 2023.".to_string(),
//!     proof_needed: false,
//!     close_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!     payout_amount: dec!(25),
//! };
//! assert_eq!(record.formatted_close_date(), "January 5, 2026");
//! ```

use crate::base::CaseId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// A claim opportunity the user can select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub id: CaseId,
    pub name: String,
    pub description: String,
    pub proof_needed: bool,
    pub close_date: NaiveDate,
    pub payout_amount: Decimal,
}

impl CaseRecord {
    /// Whole days between `now` and midnight UTC of the close date.
    ///
    /// Partial days are dropped and closed cases report zero.
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let closes_at = self.close_date.and_time(NaiveTime::default()).and_utc();
        (closes_at - now)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY)
            .max(0)
    }

    /// `"1 day left"`, `"12 days left"`.
    pub fn days_left_label(&self, now: DateTime<Utc>) -> String {
        let days = self.days_left(now);
        if days == 1 {
            "1 day left".to_string()
        } else {
            format!("{days} days left")
        }
    }

    /// Close date as `"January 5, 2026"`.
    pub fn formatted_close_date(&self) -> String {
        self.close_date.format("%B %-d, %Y").to_string()
    }
}

/// Formats an amount for display, e.g. `$35` or `$12.5`.
pub fn format_payout(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}
