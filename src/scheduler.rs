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

//! Animation scheduler.
//!
//! Exactly one "amount added" animation is active at a time. Requests that
//! arrive while one is active wait in a FIFO queue and are activated one by
//! one as each active animation completes, with no idle gap in between.
//!
//! ```text
//! Idle ──request(a)──► Animating(a, [])
//! Animating(x, q) ──request(a)──► Animating(x, q + [a])
//! Animating(x, [h, ..rest]) ──complete──► Animating(h, rest)
//! Animating(x, []) ──complete──► Idle
//! ```
//!
//! Every activation gets a fresh generation number. A timer that was armed for
//! an older activation completes with a stale generation and is ignored.

use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::time::Instant;

/// A queued animation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationQueueItem {
    pub amount: Decimal,
    pub enqueued_at: Instant,
}

/// The animation currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub amount: Decimal,
    pub generation: u64,
}

/// Result of a completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The next queued amount is now active.
    Next(Activation),
    /// The queue was empty; the scheduler is idle.
    Idle,
    /// Nothing changed: the scheduler was idle or the generation was stale.
    Ignored,
}

impl Completion {
    /// The activation that needs a timer, if any.
    pub fn activation(self) -> Option<Activation> {
        match self {
            Self::Next(activation) => Some(activation),
            Self::Idle | Self::Ignored => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimationScheduler {
    active: Option<Activation>,
    queue: VecDeque<AnimationQueueItem>,
    /// Generation of the most recent activation.
    generation: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.active.is_some() || self.queue.is_empty(),
            "Invariant violated: {} queued animations while idle",
            self.queue.len()
        );
    }

    fn activate(&mut self, amount: Decimal) -> Activation {
        self.generation += 1;
        let activation = Activation {
            amount,
            generation: self.generation,
        };
        self.active = Some(activation);
        activation
    }

    /// Starts animating `amount` now if idle, otherwise queues it.
    ///
    /// Returns the new activation when the scheduler was idle.
    pub fn request_animation(&mut self, amount: Decimal) -> Option<Activation> {
        let activation = if self.active.is_some() {
            self.queue.push_back(AnimationQueueItem {
                amount,
                enqueued_at: Instant::now(),
            });
            tracing::debug!(%amount, queued = self.queue.len(), "animation queued");
            None
        } else {
            let activation = self.activate(amount);
            tracing::debug!(%amount, generation = activation.generation, "animation started");
            Some(activation)
        };
        self.assert_invariants();
        activation
    }

    /// Completes the active animation, whichever it is.
    ///
    /// A no-op while idle.
    pub fn complete_active(&mut self) -> Completion {
        if self.active.is_none() {
            tracing::debug!("completion while idle ignored");
            return Completion::Ignored;
        }

        let completion = match self.queue.pop_front() {
            Some(next) => {
                let activation = self.activate(next.amount);
                tracing::debug!(
                    amount = %activation.amount,
                    generation = activation.generation,
                    waited_ms = next.enqueued_at.elapsed().as_millis() as u64,
                    "queued animation started"
                );
                Completion::Next(activation)
            }
            None => {
                self.active = None;
                tracing::debug!("animations finished");
                Completion::Idle
            }
        };
        self.assert_invariants();
        completion
    }

    /// Completes the active animation only if it is `generation`.
    pub fn complete(&mut self, generation: u64) -> Completion {
        match self.active {
            Some(active) if active.generation == generation => self.complete_active(),
            _ => {
                tracing::debug!(generation, current = self.generation, "stale completion ignored");
                Completion::Ignored
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<Activation> {
        self.active
    }

    pub fn active_amount(&self) -> Option<Decimal> {
        self.active.map(|activation| activation.amount)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queued amounts in the order they will be shown.
    pub fn queued_amounts(&self) -> Vec<Decimal> {
        self.queue.iter().map(|item| item.amount).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn idle_request_activates_immediately() {
        let mut scheduler = AnimationScheduler::new();
        let activation = scheduler.request_animation(dec!(5)).unwrap();

        assert_eq!(activation.amount, dec!(5));
        assert!(scheduler.is_animating());
        assert_eq!(scheduler.queue_len(), 0);
    }

    #[test]
    fn busy_request_is_queued() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.request_animation(dec!(5));

        assert_eq!(scheduler.request_animation(dec!(3)), None);
        assert_eq!(scheduler.request_animation(dec!(8)), None);
        assert_eq!(scheduler.active_amount(), Some(dec!(5)));
        assert_eq!(scheduler.queued_amounts(), vec![dec!(3), dec!(8)]);
    }

    #[test]
    fn completion_drains_queue_in_order() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.request_animation(dec!(5));
        scheduler.request_animation(dec!(3));
        scheduler.request_animation(dec!(8));

        let mut shown = vec![scheduler.active_amount()];
        for _ in 0..3 {
            scheduler.complete_active();
            shown.push(scheduler.active_amount());
        }

        assert_eq!(shown, vec![Some(dec!(5)), Some(dec!(3)), Some(dec!(8)), None]);
        assert!(!scheduler.is_animating());
    }

    #[test]
    fn complete_while_idle_is_noop() {
        let mut scheduler = AnimationScheduler::new();
        assert_eq!(scheduler.complete_active(), Completion::Ignored);
        assert!(!scheduler.is_animating());
        assert_eq!(scheduler.active_amount(), None);
    }

    #[test]
    fn last_completion_reports_idle() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.request_animation(dec!(1));
        assert_eq!(scheduler.complete_active(), Completion::Idle);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut scheduler = AnimationScheduler::new();
        let first = scheduler.request_animation(dec!(5)).unwrap();
        scheduler.request_animation(dec!(3));

        let second = scheduler.complete(first.generation).activation().unwrap();
        assert_eq!(second.amount, dec!(3));

        // A late timer for the first activation must not end the second one.
        assert_eq!(scheduler.complete(first.generation), Completion::Ignored);
        assert_eq!(scheduler.active(), Some(second));

        assert_eq!(scheduler.complete(second.generation), Completion::Idle);
    }

    #[test]
    fn generations_increase_across_idle_periods() {
        let mut scheduler = AnimationScheduler::new();
        let first = scheduler.request_animation(dec!(1)).unwrap();
        scheduler.complete_active();
        let second = scheduler.request_animation(dec!(1)).unwrap();

        assert!(second.generation > first.generation);
        assert_eq!(scheduler.complete(first.generation), Completion::Ignored);
        assert!(scheduler.is_animating());
    }
}
