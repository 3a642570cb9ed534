//! Bug days and CI failure days for GitHub contribution graphs.
//!
//! [`dates::DateFetcher`] is the entry point: given a token and one or more
//! repositories it returns the calendar days (trailing 365 days) on which a
//! bug-labelled issue was closed and on which a workflow run failed.

pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod output;
pub mod providers;
pub mod repository;
pub mod signals;
