//! Invoicing and collection statistics over a filtered set of order relations.
//!
//! The summary carries counts and summed times for the whole set, for the
//! invoiced and collected subsets, and for their complements, plus the share
//! of total time in each segment and a per-client time breakdown.
//!
//! Complements are derived by subtraction, so the two flags are assumed to be
//! strictly `S`/`N`.
//!
//! There are two entry points:
//!
//! - [`StatisticsSummary::summarize`] reduces records already in memory in a
//!   single pass.
//! - [`StatisticsSummary::aggregate`] asks a [`RelationSource`] for each
//!   metric. A failed sub-query leaves its fields at their zero defaults and
//!   logs a warning; the summary itself is always produced.
//!
//! ```rust
//! use dexus::libs::statistics::{RelationRecord, StatisticsSummary};
//! use dexus::libs::status::Flag;
//!
//! let records = vec![
//!     RelationRecord::new(1, Some("ACME"), Some("01:00"), Flag::Yes, Flag::No),
//!     RelationRecord::new(1, Some("ACME"), Some("02:30"), Flag::Yes, Flag::No),
//!     RelationRecord::new(2, None, Some("00:30"), Flag::No, Flag::No),
//! ];
//! let summary = StatisticsSummary::summarize(&records);
//! assert_eq!(summary.total_time.to_string(), "04:00");
//! assert_eq!(summary.invoiced_percent, 88);
//! ```

use crate::libs::duration::Duration;
use crate::libs::error::AppResult;
use crate::libs::messages::Message;
use crate::libs::status::Flag;
use serde::Serialize;
use std::collections::HashMap;

/// Subset of the filtered relations a count query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    All,
    Invoiced,
    Collected,
}

/// The fields of one order relation the statistics need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRecord {
    pub client_id: i64,
    pub client_name: Option<String>,
    pub total_time: Option<String>,
    pub invoiced: Flag,
    pub collected: Flag,
}

impl RelationRecord {
    pub fn new(client_id: i64, client_name: Option<&str>, total_time: Option<&str>, invoiced: Flag, collected: Flag) -> Self {
        RelationRecord {
            client_id,
            client_name: client_name.map(str::to_string),
            total_time: total_time.map(str::to_string),
            invoiced,
            collected,
        }
    }

    fn duration(&self) -> Duration {
        Duration::parse_opt(self.total_time.as_deref())
    }
}

/// Read access to the relations selected by one filter.
pub trait RelationSource {
    fn count(&self, segment: Segment) -> AppResult<i64>;

    fn records(&self) -> AppResult<Vec<RelationRecord>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientTime {
    pub client_id: i64,
    pub client_name: String,
    pub total_time: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsSummary {
    pub total_count: i64,
    pub invoiced_count: i64,
    pub not_invoiced_count: i64,
    pub collected_count: i64,
    pub not_collected_count: i64,

    pub total_time: Duration,
    pub invoiced_time: Duration,
    pub not_invoiced_time: Duration,
    pub collected_time: Duration,
    pub not_collected_time: Duration,

    pub invoiced_percent: i64,
    pub not_invoiced_percent: i64,
    pub collected_percent: i64,
    pub not_collected_percent: i64,

    pub clients: Vec<ClientTime>,
}

#[derive(Default)]
struct TimeTotals {
    all: Duration,
    invoiced: Duration,
    collected: Duration,
    clients: Vec<ClientTime>,
}

impl TimeTotals {
    fn accumulate(records: &[RelationRecord]) -> Self {
        let mut totals = TimeTotals::default();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for record in records {
            let duration = record.duration();
            totals.all = totals.all + duration;
            if record.invoiced.is_set() {
                totals.invoiced = totals.invoiced + duration;
            }
            if record.collected.is_set() {
                totals.collected = totals.collected + duration;
            }

            match index.get(&record.client_id) {
                Some(&i) => totals.clients[i].total_time = totals.clients[i].total_time + duration,
                None => {
                    index.insert(record.client_id, totals.clients.len());
                    totals.clients.push(ClientTime {
                        client_id: record.client_id,
                        client_name: record.client_name.clone().unwrap_or_default(),
                        total_time: duration,
                    });
                }
            }
        }

        totals
    }
}

/// Share of `part` in `total`, rounded half away from zero; 0 for an empty total.
pub fn percent_of(part: Duration, total: Duration) -> i64 {
    if total.is_zero() {
        return 0;
    }
    (part.minutes() as f64 / total.minutes() as f64 * 100.0).round() as i64
}

impl StatisticsSummary {
    fn build(total_count: i64, invoiced_count: i64, collected_count: i64, times: TimeTotals) -> Self {
        let not_invoiced_time = times.all - times.invoiced;
        let not_collected_time = times.all - times.collected;

        StatisticsSummary {
            total_count,
            invoiced_count,
            not_invoiced_count: total_count - invoiced_count,
            collected_count,
            not_collected_count: total_count - collected_count,

            total_time: times.all,
            invoiced_time: times.invoiced,
            not_invoiced_time,
            collected_time: times.collected,
            not_collected_time,

            invoiced_percent: percent_of(times.invoiced, times.all),
            not_invoiced_percent: percent_of(not_invoiced_time, times.all),
            collected_percent: percent_of(times.collected, times.all),
            not_collected_percent: percent_of(not_collected_time, times.all),

            clients: times.clients,
        }
    }

    /// Single pass over records already fetched.
    pub fn summarize(records: &[RelationRecord]) -> Self {
        let total = records.len() as i64;
        let invoiced = records.iter().filter(|r| r.invoiced.is_set()).count() as i64;
        let collected = records.iter().filter(|r| r.collected.is_set()).count() as i64;

        Self::build(total, invoiced, collected, TimeTotals::accumulate(records))
    }

    /// Queries `source` metric by metric, keeping defaults for failed queries.
    pub fn aggregate<S: RelationSource + ?Sized>(source: &S) -> Self {
        let total = degrade("total_count", source.count(Segment::All));
        let invoiced = degrade("invoiced_count", source.count(Segment::Invoiced));
        let collected = degrade("collected_count", source.count(Segment::Collected));

        let times = match source.records() {
            Ok(records) => TimeTotals::accumulate(&records),
            Err(e) => {
                tracing::warn!("{}", Message::StatisticsQueryFailed("durations", e.to_string()));
                TimeTotals::default()
            }
        };

        Self::build(total, invoiced, collected, times)
    }
}

fn degrade(metric: &'static str, result: AppResult<i64>) -> i64 {
    result.unwrap_or_else(|e| {
        tracing::warn!("{}", Message::StatisticsQueryFailed(metric, e.to_string()));
        0
    })
}
