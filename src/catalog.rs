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

//! Read-only case catalog.
//!
//! The catalog is loaded once at session start from a JSON array of case
//! objects and is never mutated afterwards. Payout amounts are accepted as
//! JSON numbers or as currency-formatted strings and are normalised to
//! [`Decimal`] here, so nothing downstream ever sees a formatted amount.
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "name": "Bottled Water Settlement",
//!     "description": "Purchased bottled water between 2019 and 2023.",
//!     "proof_needed": false,
//!     "close_date": "2026-01-05",
//!     "payout_amount": "$1,250.00"
//!   }
//! ]
//! ```

use crate::base::CaseId;
use crate::case::CaseRecord;
use crate::error::CatalogError;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Largest payout a catalog case may carry.
///
/// Case ids are `u32`, so a catalog holds at most `u32::MAX` cases. At this
/// ceiling their combined payouts stay below 5e21, well inside
/// [`Decimal::MAX`] (about 7.9e28), so selecting every case cannot overflow
/// the running total.
pub const MAX_PAYOUT: Decimal = dec!(1_000_000_000_000);

/// Case record as it appears in catalog JSON.
#[derive(Debug, Deserialize)]
struct CaseJson {
    id: u32,
    name: String,
    description: String,
    proof_needed: bool,
    close_date: String,
    payout_amount: RawPayout,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayout {
    Number(serde_json::Number),
    Text(String),
}

impl CaseJson {
    fn into_record(self) -> Result<CaseRecord, CatalogError> {
        let id = CaseId(self.id);
        let payout_amount = parse_payout(id, &self.payout_amount)?;
        let close_date = parse_close_date(&self.close_date).ok_or_else(|| {
            CatalogError::InvalidCloseDate {
                case_id: id,
                raw: self.close_date.clone(),
            }
        })?;

        Ok(CaseRecord {
            id,
            name: self.name,
            description: self.description,
            proof_needed: self.proof_needed,
            close_date,
            payout_amount,
        })
    }
}

fn parse_payout(case_id: CaseId, raw: &RawPayout) -> Result<Decimal, CatalogError> {
    let text = match raw {
        RawPayout::Number(number) => number.to_string(),
        // "$1,250.00" -> "1250.00"
        RawPayout::Text(text) => text
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect(),
    };

    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| CatalogError::InvalidPayout {
            case_id,
            raw: text.clone(),
        })?;

    if amount < Decimal::ZERO {
        return Err(CatalogError::NegativePayout(case_id));
    }
    if amount > MAX_PAYOUT {
        return Err(CatalogError::PayoutTooLarge {
            case_id,
            amount,
            max: MAX_PAYOUT,
        });
    }
    Ok(amount)
}

fn parse_close_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Ordered, immutable list of cases.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cases: Vec<CaseRecord>,
    index: HashMap<CaseId, usize>,
}

impl Catalog {
    /// Builds a catalog from records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCase`] if two records share an id.
    pub fn new(cases: Vec<CaseRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(cases.len());
        for (position, case) in cases.iter().enumerate() {
            if index.insert(case.id, position).is_some() {
                return Err(CatalogError::DuplicateCase(case.id));
            }
        }
        Ok(Self { cases, index })
    }

    /// Parses a catalog from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let raw: Vec<CaseJson> = serde_json::from_reader(reader)?;
        let cases = raw
            .into_iter()
            .map(CaseJson::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(cases = cases.len(), "catalog loaded");
        Self::new(cases)
    }

    /// Parses a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_reader(json.as_bytes())
    }

    /// Loads a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn get(&self, id: CaseId) -> Option<&CaseRecord> {
        self.index.get(&id).map(|&position| &self.cases[position])
    }

    /// Cases in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CaseRecord> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
