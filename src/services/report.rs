//! Aggregate library statistics

use chrono::NaiveDate;
use std::fmt;

use crate::models::LibraryState;

/// Snapshot of the library's counters, computed from state without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryReport {
    pub unique_titles: usize,
    pub total_copies: u64,
    pub available_copies: u64,
    pub held_copies: u64,
    /// Share of copies on the shelf, 0.0 when the library owns no copies.
    pub availability_percentage: f64,
    pub user_count: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub pending_reservations: usize,
}

impl LibraryReport {
    pub fn from_state(state: &LibraryState, today: NaiveDate) -> Self {
        let total_copies: u64 = state
            .books
            .values()
            .map(|b| u64::from(b.total_copies))
            .sum();
        let available_copies: u64 = state
            .books
            .values()
            .map(|b| u64::from(b.available_copies))
            .sum();
        let held_copies: u64 = state
            .books
            .values()
            .map(|b| u64::from(b.held_copies()))
            .sum();
        let pending_reservations: usize = state
            .books
            .values()
            .map(|b| b.reservation_queue.len())
            .sum();

        let availability_percentage = if total_copies == 0 {
            0.0
        } else {
            available_copies as f64 / total_copies as f64 * 100.0
        };

        let active = state.users.values().flat_map(|user| user.active_loans());
        let (active_loans, overdue_loans) = active.fold((0, 0), |(count, overdue), loan| {
            (count + 1, overdue + usize::from(loan.is_overdue(today)))
        });

        Self {
            unique_titles: state.books.len(),
            total_copies,
            available_copies,
            held_copies,
            availability_percentage,
            user_count: state.users.len(),
            active_loans,
            overdue_loans,
            pending_reservations,
        }
    }
}

impl fmt::Display for LibraryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unique titles:        {}", self.unique_titles)?;
        writeln!(f, "Total copies:         {}", self.total_copies)?;
        writeln!(
            f,
            "Available copies:     {} ({:.1}%)",
            self.available_copies, self.availability_percentage
        )?;
        writeln!(f, "Copies on hold:       {}", self.held_copies)?;
        writeln!(f, "Registered users:     {}", self.user_count)?;
        writeln!(f, "Active loans:         {}", self.active_loans)?;
        writeln!(f, "Overdue loans:        {}", self.overdue_loans)?;
        write!(f, "Pending reservations: {}", self.pending_reservations)
    }
}
