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

//! Counter store.
//!
//! [`CounterStore`] is the single state container behind the running-total
//! counter. It composes a [`SelectionLedger`] and an [`AnimationScheduler`]:
//! the ledger's [`SelectionEvent::Added`] events become animation requests,
//! removals never do. Presentation code reads it through [`CounterStore::snapshot`].
//!
//! The store is constructed explicitly and shared by `Arc`; independent
//! instances never see each other's state.
//!
//! # Example
//!
//! ```
//! use claim_tally::{CaseId, CounterStore};
//! use rust_decimal_macros::dec;
//!
//! let store = CounterStore::default();
//! store.toggle(CaseId(1), dec!(20));
//! store.toggle(CaseId(2), dec!(15));
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.total, dec!(35));
//! assert_eq!(snapshot.active_amount, Some(dec!(20)));
//! assert_eq!(snapshot.queue_length, 1);
//! ```

use crate::base::CaseId;
use crate::ledger::{SelectionEvent, SelectionLedger};
use crate::scheduler::{Activation, AnimationScheduler, Completion};
use crate::telemetry::{NoopTelemetry, TelemetryEvent, TelemetrySink};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::Arc;

#[derive(Debug, Default)]
struct StoreData {
    ledger: SelectionLedger,
    scheduler: AnimationScheduler,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub event: SelectionEvent,
    /// Set when the selection started an animation right away.
    pub activation: Option<Activation>,
}

/// Read-only view of the store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub total: Decimal,
    pub selected_ids: Vec<CaseId>,
    pub is_animating: bool,
    pub active_amount: Option<Decimal>,
    pub queue_length: usize,
}

impl CounterSnapshot {
    const DECIMAL_PRECISION: u32 = 2;
}

impl Serialize for CounterSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CounterSnapshot", 5)?;
        state.serialize_field(
            "total",
            &self.total.round_dp(CounterSnapshot::DECIMAL_PRECISION),
        )?;
        state.serialize_field("selected_ids", &self.selected_ids)?;
        state.serialize_field("is_animating", &self.is_animating)?;
        state.serialize_field(
            "active_amount",
            &self
                .active_amount
                .map(|amount| amount.round_dp(CounterSnapshot::DECIMAL_PRECISION)),
        )?;
        state.serialize_field("queue_length", &self.queue_length)?;
        state.end()
    }
}

/// Selection ledger and animation scheduler behind one lock.
pub struct CounterStore {
    inner: Mutex<StoreData>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl CounterStore {
    pub fn new(telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            inner: Mutex::new(StoreData::default()),
            telemetry,
        }
    }

    /// Selects or deselects a case.
    ///
    /// A selection adds `amount` to the total and requests an animation of it.
    /// A deselection subtracts `amount` and leaves any pending animation alone.
    /// A toggle that would overflow the total changes nothing.
    pub fn toggle(&self, case_id: CaseId, amount: Decimal) -> ToggleOutcome {
        let outcome = {
            let mut data = self.inner.lock();
            let event = data.ledger.toggle(case_id, amount);
            let activation = match event {
                SelectionEvent::Added { amount, .. } => data.scheduler.request_animation(amount),
                SelectionEvent::Removed { .. } | SelectionEvent::Rejected { .. } => None,
            };
            ToggleOutcome { event, activation }
        };

        let event = match outcome.event {
            SelectionEvent::Added { case_id, amount } => {
                TelemetryEvent::CaseSelected { case_id, amount }
            }
            SelectionEvent::Removed { case_id, amount } => {
                TelemetryEvent::CaseDeselected { case_id, amount }
            }
            SelectionEvent::Rejected { .. } => return outcome,
        };
        self.telemetry.capture(event);
        outcome
    }

    /// Completes the active animation, activating the next queued one if any.
    ///
    /// A no-op while idle.
    pub fn complete_active(&self) -> Completion {
        self.inner.lock().scheduler.complete_active()
    }

    /// Completes the active animation only if it is still `generation`.
    ///
    /// Timers use this so that one armed for an earlier activation cannot end
    /// a later one.
    pub fn complete(&self, generation: u64) -> Completion {
        self.inner.lock().scheduler.complete(generation)
    }

    /// Reports that the user closed a case's detail dialog.
    pub fn dismiss_dialog(&self, case_id: CaseId) {
        self.telemetry
            .capture(TelemetryEvent::DialogDismissed { case_id });
    }

    /// Reports a page view.
    pub fn page_view(&self, path: &str) {
        self.telemetry.capture(TelemetryEvent::PageView {
            path: path.to_string(),
        });
    }

    pub fn is_selected(&self, case_id: CaseId) -> bool {
        self.inner.lock().ledger.is_selected(case_id)
    }

    pub fn total(&self) -> Decimal {
        self.inner.lock().ledger.total()
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let data = self.inner.lock();
        let snapshot = CounterSnapshot {
            total: data.ledger.total(),
            selected_ids: data.ledger.selected_ids(),
            is_animating: data.scheduler.is_animating(),
            active_amount: data.scheduler.active_amount(),
            queue_length: data.scheduler.queue_len(),
        };
        tracing::trace!(?snapshot, "snapshot");
        snapshot
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new(Arc::new(NoopTelemetry))
    }
}
