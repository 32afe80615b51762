//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, TimeZone, Utc};

use crate::core::ledger::Ledger;
use crate::core::state::App;

/// Fixed clock for tests: the seed time of [`test_app`].
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Creates a test App over an in-memory ledger seeded at [`test_now`].
pub fn test_app() -> App {
    App::new(Ledger::in_memory(test_now()))
}
