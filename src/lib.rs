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

//! # Claim Tally
//!
//! This library provides the state behind a "potential claim earnings" counter:
//! users browse a catalog of cases, select the ones that apply to them, and the
//! running total grows with a short animation for every newly selected amount.
//!
//! ## Core Components
//!
//! - [`SelectionLedger`]: Selected case ids and the running total
//! - [`AnimationScheduler`]: One active "amount added" animation plus a FIFO queue
//! - [`CounterStore`]: Composes both behind one lock and exposes [`CounterSnapshot`]
//! - [`AnimationTimer`]: Completes animations in real time on a tokio runtime
//! - [`Catalog`]: Read-only list of [`CaseRecord`]s loaded from JSON
//! - [`TelemetrySink`]: Fire-and-forget destination for user action events
//!
//! ## Example
//!
//! ```
//! use claim_tally::{CaseId, CounterStore};
//! use rust_decimal_macros::dec;
//!
//! let store = CounterStore::default();
//!
//! // Select two cases in quick succession
//! store.toggle(CaseId(1), dec!(20));
//! store.toggle(CaseId(2), dec!(15));
//! assert_eq!(store.snapshot().total, dec!(35));
//!
//! // The first animation ends, the queued one takes over
//! store.complete_active();
//! assert_eq!(store.snapshot().active_amount, Some(dec!(15)));
//!
//! // Deselecting does not touch the animation
//! store.toggle(CaseId(1), dec!(20));
//! assert_eq!(store.snapshot().total, dec!(15));
//! assert_eq!(store.snapshot().active_amount, Some(dec!(15)));
//! ```
//!
//! ## Concurrency
//!
//! Every transition runs to completion under the store's lock, so a snapshot
//! never shows a total that disagrees with the selected ids.

mod base;
pub mod case;
pub mod catalog;
pub mod config;
pub mod error;
mod ledger;
mod scheduler;
mod store;
pub mod telemetry;
mod timer;

pub use base::CaseId;
pub use case::{CaseRecord, format_payout};
pub use catalog::{Catalog, MAX_PAYOUT};
pub use config::CounterConfig;
pub use error::{CatalogError, IntentError};
pub use ledger::{SelectionEvent, SelectionLedger};
pub use scheduler::{Activation, AnimationQueueItem, AnimationScheduler, Completion};
pub use store::{CounterSnapshot, CounterStore, ToggleOutcome};
pub use telemetry::{ChannelTelemetry, NoopTelemetry, TelemetryEvent, TelemetrySink};
pub use timer::AnimationTimer;
