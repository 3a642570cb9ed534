//! Date-signal aggregation: turns GitHub issue and workflow-run listings into
//! sets of calendar days.

mod aggregate;
mod extract;
mod query;
mod types;

pub use aggregate::aggregate;
pub use extract::{extract_bug_days, extract_failure_days, record_bug_day, record_failure_day};
pub use query::{
    normalize_label, BugIssueQuery, FailedRunQuery, SignalQuery, DEFAULT_BUG_LABEL,
    ISSUE_SEARCH_MAX_PAGES, WORKFLOW_RUN_MAX_PAGES,
};
pub use types::{CalendarDaySet, SignalDates, TimeWindow, WINDOW_DAYS};
