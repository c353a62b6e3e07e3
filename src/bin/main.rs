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

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use claim_tally::{
    AnimationTimer, CaseId, Catalog, CounterConfig, CounterSnapshot, CounterStore, IntentError,
    format_payout,
};
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Claim Tally - Replay case selections against the payout counter
///
/// Loads a case catalog, replays recorded user intents and writes the counter
/// state after every intent to stdout as CSV.
#[derive(Parser, Debug)]
#[command(name = "claim-tally")]
#[command(about = "Replays case selection intents against the payout counter", long_about = None)]
struct Args {
    /// Path to the case catalog JSON
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// Path to CSV file with intents
    ///
    /// Expected format: intent,case
    /// Example: cargo run -- --catalog cases.json intents.csv > steps.csv
    #[arg(value_name = "FILE", required_unless_present = "list")]
    intents: Option<PathBuf>,

    /// Print the catalog instead of replaying intents
    #[arg(long)]
    list: bool,

    /// Complete animations with a real-time timer; `complete` rows are ignored
    ///
    /// Intents are replayed back to back, so no timer fires between them and
    /// every intent row shows the state at time zero. Timers run once the file
    /// is exhausted; the trailing `settled` row shows the state after they do.
    #[arg(long)]
    live: bool,

    /// How long one animation stays on screen, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 400)]
    animation_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let catalog = Catalog::load(&args.catalog)
        .with_context(|| format!("loading catalog '{}'", args.catalog.display()))?;

    if args.list {
        return write_catalog(&catalog, std::io::stdout()).context("writing catalog");
    }

    // clap guarantees the path when --list is absent
    let Some(path) = args.intents else {
        anyhow::bail!("missing intents file");
    };
    let file = File::open(&path)
        .with_context(|| format!("opening intents '{}'", path.display()))?;

    let config =
        CounterConfig::default().with_display_duration(Duration::from_millis(args.animation_ms));
    let store = Arc::new(CounterStore::default());
    store.page_view("/");

    let steps = if args.live {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("starting timer runtime")?;
        let timer = AnimationTimer::from_config(Arc::clone(&store), &config);
        runtime.block_on(async {
            let mut steps = replay_intents(BufReader::new(file), &catalog, &Driver::Live(&timer))?;
            timer.wait_idle().await;
            steps.push(StepRecord::new(steps.len() + 1, "settled", None, &store.snapshot()));
            Ok::<_, csv::Error>(steps)
        })?
    } else {
        replay_intents(BufReader::new(file), &catalog, &Driver::Manual(&store))?
    };

    write_steps(&steps, std::io::stdout()).context("writing steps")?;
    Ok(())
}

/// A recorded user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Toggle(CaseId),
    Complete,
    Dismiss(CaseId),
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Self::Toggle(_) => "toggle",
            Self::Complete => "complete",
            Self::Dismiss(_) => "dismiss",
        }
    }

    fn case_id(&self) -> Option<CaseId> {
        match self {
            Self::Toggle(case_id) | Self::Dismiss(case_id) => Some(*case_id),
            Self::Complete => None,
        }
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `intent, case`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    intent: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    case: Option<u32>,
}

impl CsvRecord {
    fn into_intent(self) -> Result<Intent, IntentError> {
        let case_id = self.case.map(CaseId);
        match self.intent.to_lowercase().as_str() {
            "toggle" => case_id
                .map(Intent::Toggle)
                .ok_or_else(|| IntentError::MissingCase("toggle".to_string())),
            "dismiss" => case_id
                .map(Intent::Dismiss)
                .ok_or_else(|| IntentError::MissingCase("dismiss".to_string())),
            "complete" => Ok(Intent::Complete),
            _ => Err(IntentError::UnknownIntent(self.intent)),
        }
    }
}

/// How completion is driven during a replay.
enum Driver<'a> {
    /// `complete` rows advance the animation.
    Manual(&'a CounterStore),
    /// A timer advances the animation; `complete` rows are ignored.
    Live(&'a AnimationTimer),
}

impl Driver<'_> {
    fn store(&self) -> &CounterStore {
        match self {
            Self::Manual(store) => *store,
            Self::Live(timer) => timer.store().as_ref(),
        }
    }

    fn apply(&self, intent: Intent, catalog: &Catalog) -> Result<(), IntentError> {
        match intent {
            Intent::Toggle(case_id) => {
                // The presentation layer passes the payout it rendered.
                let amount = catalog
                    .get(case_id)
                    .map(|case| case.payout_amount)
                    .ok_or(IntentError::UnknownCase(case_id))?;
                match self {
                    Self::Manual(store) => {
                        store.toggle(case_id, amount);
                    }
                    Self::Live(timer) => {
                        timer.toggle(case_id, amount);
                    }
                }
            }
            Intent::Complete => {
                if let Self::Manual(store) = self {
                    store.complete_active();
                }
            }
            Intent::Dismiss(case_id) => self.store().dismiss_dialog(case_id),
        }
        Ok(())
    }
}

/// Counter state after one intent.
#[derive(Debug, Serialize)]
struct StepRecord {
    step: usize,
    intent: &'static str,
    case: Option<u32>,
    total: Decimal,
    /// Selected ids joined with `;`
    selected: String,
    is_animating: bool,
    active_amount: Option<Decimal>,
    queue_length: usize,
}

impl StepRecord {
    fn new(
        step: usize,
        intent: &'static str,
        case_id: Option<CaseId>,
        snapshot: &CounterSnapshot,
    ) -> Self {
        Self {
            step,
            intent,
            case: case_id.map(|id| id.0),
            total: snapshot.total,
            selected: snapshot
                .selected_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(";"),
            is_animating: snapshot.is_animating,
            active_amount: snapshot.active_amount,
            queue_length: snapshot.queue_length,
        }
    }
}

/// Replays intents from a CSV reader.
///
/// Malformed rows, unknown intents and cases missing from the catalog are
/// skipped and produce no step.
///
/// # CSV Format
///
/// Expected columns: `intent, case`
/// - `intent`: `toggle`, `complete` or `dismiss`
/// - `case`: Case ID (empty for `complete`)
///
/// # Example
///
/// ```csv
/// intent,case
/// toggle,1
/// toggle,2
/// complete,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails.
fn replay_intents<R: Read>(
    reader: R,
    catalog: &Catalog,
    driver: &Driver<'_>,
) -> Result<Vec<StepRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut steps = Vec::new();
    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed row");
                continue;
            }
        };

        let intent = match record.into_intent() {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(error = %e, "skipping invalid intent");
                continue;
            }
        };

        if let Err(e) = driver.apply(intent, catalog) {
            tracing::warn!(error = %e, "skipping intent");
            continue;
        }

        steps.push(StepRecord::new(
            steps.len() + 1,
            intent.name(),
            intent.case_id(),
            &driver.store().snapshot(),
        ));
    }

    Ok(steps)
}

fn write_steps<W: Write>(steps: &[StepRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for step in steps {
        wtr.serialize(step)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CatalogRow<'a> {
    id: u32,
    name: &'a str,
    payout: String,
    closes: String,
    days_left: i64,
    proof_needed: bool,
}

fn write_catalog<W: Write>(catalog: &Catalog, writer: W) -> Result<(), csv::Error> {
    let now = Utc::now();
    let mut wtr = Writer::from_writer(writer);
    for case in catalog.iter() {
        wtr.serialize(CatalogRow {
            id: case.id.0,
            name: &case.name,
            payout: format_payout(case.payout_amount),
            closes: case.formatted_close_date(),
            days_left: case.days_left(now),
            proof_needed: case.proof_needed,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
