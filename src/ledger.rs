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

//! Selection ledger.
//!
//! Owns the set of selected cases and the running total. Every toggle emits a
//! [`SelectionEvent`]; the ledger itself knows nothing about animation.
//!
//! # Example
//!
//! ```
//! use claim_tally::{CaseId, SelectionEvent, SelectionLedger};
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = SelectionLedger::new();
//! let event = ledger.toggle(CaseId(1), dec!(20));
//! assert_eq!(event, SelectionEvent::Added { case_id: CaseId(1), amount: dec!(20) });
//! assert_eq!(ledger.total(), dec!(20));
//!
//! ledger.toggle(CaseId(1), dec!(20));
//! assert_eq!(ledger.total(), dec!(0));
//! ```

use crate::base::CaseId;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Outcome of a toggle.
///
//  not selected ──toggle──► selected (Added, animation requested)
//  selected     ──toggle──► not selected (Removed, no animation)
//  either       ──toggle──► unchanged (Rejected, total would overflow)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Added { case_id: CaseId, amount: Decimal },
    Removed { case_id: CaseId, amount: Decimal },
    Rejected { case_id: CaseId, amount: Decimal },
}

impl SelectionEvent {
    pub fn case_id(&self) -> CaseId {
        match self {
            Self::Added { case_id, .. }
            | Self::Removed { case_id, .. }
            | Self::Rejected { case_id, .. } => *case_id,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Added { amount, .. }
            | Self::Removed { amount, .. }
            | Self::Rejected { amount, .. } => *amount,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Selected case ids and the running total of their payouts.
#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    /// Selected ids with the amount each was selected with.
    selected: BTreeMap<CaseId, Decimal>,
    total: Decimal,
}

impl SelectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `case_id` if it is not selected, deselects it otherwise.
    ///
    /// The amount is trusted as given. A deselect subtracts the amount passed
    /// now, even if the case was selected with a different one. If the new
    /// total would not fit in a [`Decimal`], the ledger is left as it was and
    /// the toggle reports [`SelectionEvent::Rejected`].
    pub fn toggle(&mut self, case_id: CaseId, amount: Decimal) -> SelectionEvent {
        match self.selected.get(&case_id).copied() {
            Some(selected_with) => {
                let Some(total) = self.total.checked_sub(amount) else {
                    tracing::warn!(%case_id, %amount, total = %self.total, "deselect would overflow total");
                    return SelectionEvent::Rejected { case_id, amount };
                };
                if selected_with != amount {
                    tracing::warn!(
                        %case_id,
                        %selected_with,
                        %amount,
                        "deselect amount differs from selection amount"
                    );
                }
                self.selected.remove(&case_id);
                self.total = total;
                tracing::debug!(%case_id, %amount, total = %self.total, "case deselected");
                SelectionEvent::Removed { case_id, amount }
            }
            None => {
                let Some(total) = self.total.checked_add(amount) else {
                    tracing::warn!(%case_id, %amount, total = %self.total, "select would overflow total");
                    return SelectionEvent::Rejected { case_id, amount };
                };
                self.selected.insert(case_id, amount);
                self.total = total;
                tracing::debug!(%case_id, %amount, total = %self.total, "case selected");
                SelectionEvent::Added { case_id, amount }
            }
        }
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn is_selected(&self, case_id: CaseId) -> bool {
        self.selected.contains_key(&case_id)
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<CaseId> {
        self.selected.keys().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn select_adds_amount() {
        let mut ledger = SelectionLedger::new();
        let event = ledger.toggle(CaseId(1), dec!(20));

        assert!(event.is_added());
        assert_eq!(ledger.total(), dec!(20));
        assert!(ledger.is_selected(CaseId(1)));
    }

    #[test]
    fn deselect_subtracts_amount() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(1), dec!(20));
        ledger.toggle(CaseId(2), dec!(15));

        let event = ledger.toggle(CaseId(1), dec!(20));

        assert_eq!(
            event,
            SelectionEvent::Removed {
                case_id: CaseId(1),
                amount: dec!(20)
            }
        );
        assert_eq!(ledger.total(), dec!(15));
        assert_eq!(ledger.selected_ids(), vec![CaseId(2)]);
    }

    #[test]
    fn toggling_twice_restores_state() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(3), dec!(7.25));
        ledger.toggle(CaseId(3), dec!(7.25));

        assert_eq!(ledger.total(), Decimal::ZERO);
        assert_eq!(ledger.selected_count(), 0);
    }

    #[test]
    fn mismatched_deselect_uses_caller_amount() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(1), dec!(20));
        ledger.toggle(CaseId(1), dec!(5));

        assert_eq!(ledger.total(), dec!(15));
        assert!(!ledger.is_selected(CaseId(1)));
    }

    #[test]
    fn unknown_ids_are_accepted() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(u32::MAX), dec!(1));
        assert_eq!(ledger.selected_ids(), vec![CaseId(u32::MAX)]);
    }

    #[test]
    fn selected_ids_are_sorted() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(9), dec!(1));
        ledger.toggle(CaseId(2), dec!(1));
        ledger.toggle(CaseId(5), dec!(1));
        assert_eq!(ledger.selected_ids(), vec![CaseId(2), CaseId(5), CaseId(9)]);
    }

    #[test]
    fn overflowing_select_leaves_ledger_unchanged() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(1), Decimal::MAX);

        let event = ledger.toggle(CaseId(2), Decimal::MAX);

        assert_eq!(
            event,
            SelectionEvent::Rejected {
                case_id: CaseId(2),
                amount: Decimal::MAX
            }
        );
        assert_eq!(ledger.total(), Decimal::MAX);
        assert_eq!(ledger.selected_ids(), vec![CaseId(1)]);
    }

    #[test]
    fn overflowing_deselect_keeps_case_selected() {
        let mut ledger = SelectionLedger::new();
        ledger.toggle(CaseId(1), dec!(1));
        ledger.toggle(CaseId(3), Decimal::ZERO);

        // 1 - MIN does not fit.
        let event = ledger.toggle(CaseId(3), Decimal::MIN);

        assert!(matches!(event, SelectionEvent::Rejected { case_id: CaseId(3), .. }));
        assert!(ledger.is_selected(CaseId(3)));
        assert_eq!(ledger.total(), dec!(1));
    }

    #[test]
    fn event_accessors() {
        let event = SelectionEvent::Removed {
            case_id: CaseId(4),
            amount: dec!(3),
        };
        assert_eq!(event.case_id(), CaseId(4));
        assert_eq!(event.amount(), dec!(3));
        assert!(!event.is_added());
    }
}
