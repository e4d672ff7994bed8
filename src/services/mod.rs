//! Business logic services

pub mod clock;
pub mod library;
pub mod report;

pub use clock::{Clock, FixedClock, SystemClock};
pub use library::{LibraryService, ReturnOutcome};
pub use report::LibraryReport;
