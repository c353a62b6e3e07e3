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

//! Error types for the fallible edges of the crate.
//!
//! Selection and animation transitions never fail. Errors only arise while
//! loading the case catalog or parsing recorded user intents.

use crate::base::CaseId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Case catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog is not valid JSON or does not match the case schema
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Payout amount is neither a number nor a currency string
    #[error("case {case_id}: invalid payout amount {raw:?}")]
    InvalidPayout { case_id: CaseId, raw: String },

    /// Payout amount is below zero
    #[error("case {0}: payout amount must not be negative")]
    NegativePayout(CaseId),

    /// Payout amount is above the catalog ceiling
    #[error("case {case_id}: payout amount {amount} exceeds {max}")]
    PayoutTooLarge {
        case_id: CaseId,
        amount: Decimal,
        max: Decimal,
    },

    /// Close date is not a calendar date
    #[error("case {case_id}: invalid close date {raw:?}")]
    InvalidCloseDate { case_id: CaseId, raw: String },

    /// Two records share the same id
    #[error("duplicate case id {0}")]
    DuplicateCase(CaseId),
}

/// Recorded intent errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    /// Intent kind is not `toggle`, `complete` or `dismiss`
    #[error("unknown intent {0:?}")]
    UnknownIntent(String),

    /// Intent needs a case id but none was given
    #[error("intent {0:?} requires a case id")]
    MissingCase(String),

    /// Case id is not in the catalog
    #[error("case {0} is not in the catalog")]
    UnknownCase(CaseId),
}
