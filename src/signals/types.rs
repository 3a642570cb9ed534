use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing days considered for both signals.
pub const WINDOW_DAYS: i64 = 365;

/// Lower bound for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    since: DateTime<Utc>,
}

impl TimeWindow {
    pub fn since(since: DateTime<Utc>) -> Self {
        Self { since }
    }

    /// The window ending at `now` and starting [`WINDOW_DAYS`] earlier.
    pub fn trailing_year(now: DateTime<Utc>) -> Self {
        Self::since(now - Duration::days(WINDOW_DAYS))
    }

    /// ISO-8601 form of the bound, e.g. `2024-06-01T00:00:00.000Z`.
    pub fn since_iso(&self) -> String {
        self.since.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.since
    }
}

/// Set of `YYYY-MM-DD` strings. Lexical order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDaySet(BTreeSet<String>);

impl CalendarDaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the `YYYY-MM-DD` prefix of an ISO-8601 timestamp.
    ///
    /// Returns `false` if the day was already present or the timestamp is too
    /// short to carry a date.
    pub fn insert_prefix(&mut self, timestamp: &str) -> bool {
        match timestamp.get(..10) {
            Some(day) => self.0.insert(day.to_string()),
            None => false,
        }
    }

    pub fn contains(&self, day: &str) -> bool {
        self.0.contains(day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of days per `YYYY-MM` month.
    pub fn per_month(&self) -> BTreeMap<String, usize> {
        let mut months = BTreeMap::new();
        for day in self.iter() {
            if let Some(month) = day.get(..7) {
                *months.entry(month.to_string()).or_insert(0) += 1;
            }
        }
        months
    }
}

impl FromIterator<String> for CalendarDaySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<CalendarDaySet> for Vec<String> {
    fn from(value: CalendarDaySet) -> Self {
        value.0.into_iter().collect()
    }
}

/// Result of one aggregation: days with closed bug issues and days with
/// failed workflow runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalDates {
    pub bug_days: CalendarDaySet,
    pub failure_days: CalendarDaySet,
}

impl SignalDates {
    /// Rows of `(month, bug days, failure days)` covering every month that
    /// has at least one signal.
    pub fn monthly_breakdown(&self) -> Vec<(String, usize, usize)> {
        let bugs = self.bug_days.per_month();
        let failures = self.failure_days.per_month();

        let months: BTreeSet<&String> = bugs.keys().chain(failures.keys()).collect();
        months
            .into_iter()
            .map(|month| {
                (
                    month.clone(),
                    bugs.get(month).copied().unwrap_or(0),
                    failures.get(month).copied().unwrap_or(0),
                )
            })
            .collect()
    }
}
