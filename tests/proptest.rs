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

//! Property-based tests for the counter store.
//!
//! These tests verify invariants that should hold for any sequence of
//! toggles and completions.

use claim_tally::{CaseId, CounterStore, SelectionLedger};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, VecDeque};

// =============================================================================
// Arbitrary Strategies
// =============================================================================

const CASES: usize = 8;

/// Generate a payout amount (0.01 to 10000 with 2 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One payout per case, fixed for the whole run like a catalog.
fn arb_payouts() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_amount(), CASES)
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Toggle(usize),
    Complete,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..CASES).prop_map(Op::Toggle),
        1 => Just(Op::Complete),
    ]
}

// =============================================================================
// Ledger Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Total always equals the payouts of the selected cases.
    #[test]
    fn total_matches_selected_payouts(
        payouts in arb_payouts(),
        toggles in prop::collection::vec(0..CASES, 0..40),
    ) {
        let mut ledger = SelectionLedger::new();

        for index in toggles {
            ledger.toggle(CaseId(index as u32), payouts[index]);

            let expected: Decimal = ledger
                .selected_ids()
                .iter()
                .map(|id| payouts[id.0 as usize])
                .sum();
            prop_assert_eq!(ledger.total(), expected);
        }
    }

    /// Toggling the same case twice returns to the previous state.
    #[test]
    fn double_toggle_is_identity(
        payouts in arb_payouts(),
        prefix in prop::collection::vec(0..CASES, 0..20),
        index in 0..CASES,
    ) {
        let mut ledger = SelectionLedger::new();
        for i in prefix {
            ledger.toggle(CaseId(i as u32), payouts[i]);
        }
        let total = ledger.total();
        let selected = ledger.selected_ids();

        ledger.toggle(CaseId(index as u32), payouts[index]);
        ledger.toggle(CaseId(index as u32), payouts[index]);

        prop_assert_eq!(ledger.total(), total);
        prop_assert_eq!(ledger.selected_ids(), selected);
    }

    /// Selected ids never contain duplicates.
    #[test]
    fn selected_ids_are_unique(
        payouts in arb_payouts(),
        toggles in prop::collection::vec(0..CASES, 0..40),
    ) {
        let mut ledger = SelectionLedger::new();
        let mut model = BTreeSet::new();

        for index in toggles {
            let id = CaseId(index as u32);
            ledger.toggle(id, payouts[index]);
            if !model.remove(&id) {
                model.insert(id);
            }

            let selected = ledger.selected_ids();
            let unique: BTreeSet<_> = selected.iter().copied().collect();
            prop_assert_eq!(unique.len(), selected.len());
            prop_assert_eq!(unique, model.clone());
        }
    }
}

// =============================================================================
// Store Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Animations play in selection order, one per selection, none dropped.
    #[test]
    fn animations_play_in_selection_order(
        payouts in arb_payouts(),
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let store = CounterStore::default();
        let mut requested = Vec::new();
        let mut shown = Vec::new();

        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let outcome = store.toggle(CaseId(index as u32), payouts[index]);
                    if outcome.event.is_added() {
                        requested.push(payouts[index]);
                    }
                    if let Some(activation) = outcome.activation {
                        shown.push(activation.amount);
                    }
                }
                Op::Complete => {
                    if let Some(activation) = store.complete_active().activation() {
                        shown.push(activation.amount);
                    }
                }
            }
        }

        // Drain whatever is still pending.
        while store.snapshot().is_animating {
            if let Some(activation) = store.complete_active().activation() {
                shown.push(activation.amount);
            }
        }

        prop_assert_eq!(shown, requested);
    }

    /// Snapshot state always matches a simple queue model.
    #[test]
    fn snapshot_matches_queue_model(
        payouts in arb_payouts(),
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let store = CounterStore::default();
        let mut active: Option<Decimal> = None;
        let mut queue: VecDeque<Decimal> = VecDeque::new();

        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let outcome = store.toggle(CaseId(index as u32), payouts[index]);
                    if outcome.event.is_added() {
                        if active.is_some() {
                            queue.push_back(payouts[index]);
                        } else {
                            active = Some(payouts[index]);
                        }
                    }
                }
                Op::Complete => {
                    if active.is_some() {
                        active = queue.pop_front();
                    }
                }
            }

            let snapshot = store.snapshot();
            prop_assert_eq!(snapshot.is_animating, active.is_some());
            prop_assert_eq!(snapshot.active_amount, active);
            prop_assert_eq!(snapshot.queue_length, queue.len());
            prop_assert!(snapshot.is_animating || snapshot.queue_length == 0);
        }
    }

    /// Completions never change the selection or the total.
    #[test]
    fn completion_leaves_ledger_alone(
        payouts in arb_payouts(),
        toggles in prop::collection::vec(0..CASES, 1..20),
        completions in 0usize..25,
    ) {
        let store = CounterStore::default();
        for index in toggles {
            store.toggle(CaseId(index as u32), payouts[index]);
        }
        let before = store.snapshot();

        for _ in 0..completions {
            store.complete_active();
        }

        let after = store.snapshot();
        prop_assert_eq!(after.total, before.total);
        prop_assert_eq!(after.selected_ids, before.selected_ids);
    }
}
