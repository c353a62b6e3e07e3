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

//! Real-time driver for the animation scheduler.
//!
//! The scheduler itself never waits. [`AnimationTimer`] is the one place that
//! does: each activation gets a tokio task that sleeps for the display
//! duration and then completes that activation by generation. A task that
//! wakes after its activation was already replaced completes nothing.
//!
//! Drive a store either through a timer or through manual
//! [`CounterStore::complete_active`] calls, not both.

use crate::base::CaseId;
use crate::config::CounterConfig;
use crate::scheduler::{Activation, Completion};
use crate::store::{CounterStore, ToggleOutcome};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct AnimationTimer {
    store: Arc<CounterStore>,
    display: Duration,
    idle: Arc<Notify>,
}

impl AnimationTimer {
    pub fn new(store: Arc<CounterStore>, display: Duration) -> Self {
        Self {
            store,
            display,
            idle: Arc::new(Notify::new()),
        }
    }

    pub fn from_config(store: Arc<CounterStore>, config: &CounterConfig) -> Self {
        Self::new(store, config.display_duration)
    }

    pub fn store(&self) -> &Arc<CounterStore> {
        &self.store
    }

    /// Toggles a case and arms a timer if the selection started an animation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn toggle(&self, case_id: CaseId, amount: Decimal) -> ToggleOutcome {
        let outcome = self.store.toggle(case_id, amount);
        if let Some(activation) = outcome.activation {
            self.schedule(activation);
        }
        outcome
    }

    /// Completes `activation` once the display duration has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, activation: Activation) {
        let timer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timer.display).await;
            match timer.store.complete(activation.generation) {
                Completion::Next(next) => timer.schedule(next),
                Completion::Idle => timer.idle.notify_waiters(),
                Completion::Ignored => {
                    tracing::debug!(generation = activation.generation, "timer fired late");
                }
            }
        });
    }

    /// Resolves once no animation is active.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.store.snapshot().is_animating {
                return;
            }
            notified.await;
        }
    }
}
