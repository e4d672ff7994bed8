//! Integration tests for the library registry

mod library_tests;
mod persistence_tests;

use chrono::NaiveDate;
use library_manager::services::{FixedClock, LibraryService};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Registry with a 14 day loan period, starting on 2024-03-01
pub fn library() -> (LibraryService, FixedClock) {
    let clock = FixedClock::new(date(2024, 3, 1));
    (LibraryService::with_clock(14, clock.clone()), clock)
}
