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

//! Runtime configuration.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// How long one "amount added" animation stays on screen.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(400);

/// Telemetry events buffered before new ones are dropped.
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 256;

/// Settings for a counter session.
///
/// Deserializes from JSON with the display duration in milliseconds; missing
/// fields take their defaults.
///
/// ```
/// use claim_tally::CounterConfig;
/// use std::time::Duration;
///
/// let config: CounterConfig = serde_json::from_str(r#"{"display_duration_ms": 250}"#).unwrap();
/// assert_eq!(config.display_duration, Duration::from_millis(250));
/// assert_eq!(config.telemetry_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    #[serde(rename = "display_duration_ms", deserialize_with = "millis")]
    pub display_duration: Duration,
    pub telemetry_capacity: usize,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            display_duration: DEFAULT_DISPLAY_DURATION,
            telemetry_capacity: DEFAULT_TELEMETRY_CAPACITY,
        }
    }
}

impl CounterConfig {
    pub fn with_display_duration(mut self, display_duration: Duration) -> Self {
        self.display_duration = display_duration;
        self
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
