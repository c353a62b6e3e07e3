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

//! Fire-and-forget telemetry.
//!
//! The store reports user actions to a [`TelemetrySink`]. Capturing never
//! blocks and never fails from the caller's point of view: a sink that cannot
//! take an event drops it.

use crate::base::CaseId;
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use rust_decimal::Decimal;
use serde::Serialize;

/// A user action worth reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    PageView { path: String },
    CaseSelected { case_id: CaseId, amount: Decimal },
    CaseDeselected { case_id: CaseId, amount: Decimal },
    DialogDismissed { case_id: CaseId },
}

/// Destination for telemetry events.
pub trait TelemetrySink: Send + Sync {
    fn capture(&self, event: TelemetryEvent);
}

/// Drops every event. Used when no analytics backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn capture(&self, _event: TelemetryEvent) {}
}

/// Forwards events into a bounded channel drained by some other component.
#[derive(Debug, Clone)]
pub struct ChannelTelemetry {
    sender: Sender<TelemetryEvent>,
}

impl ChannelTelemetry {
    /// Creates a sink and the receiver its events arrive on.
    pub fn bounded(capacity: usize) -> (Self, Receiver<TelemetryEvent>) {
        let (sender, receiver) = channel::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl TelemetrySink for ChannelTelemetry {
    fn capture(&self, event: TelemetryEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!(?event, "telemetry channel full, event dropped");
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::debug!(?event, "telemetry receiver gone, event dropped");
            }
        }
    }
}
