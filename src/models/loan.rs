//! Loan (borrow) model

use chrono::NaiveDate;
use std::fmt;

/// A single borrowing of one copy of a book.
///
/// The loan refers to its book by title and to its borrower by id; the
/// registry remains the only owner of `Book` and `User` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub book_title: String,
    pub user_id: u32,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// Unreturned and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && today > self.due_date
    }

    pub fn was_returned_late(&self) -> bool {
        self.return_date.is_some_and(|returned| returned > self.due_date)
    }

    /// Whole days past the due date as of `today`, zero when not overdue.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' to user {}, issued {}, due {}",
            self.book_title,
            self.user_id,
            self.issue_date.format("%Y-%m-%d"),
            self.due_date.format("%Y-%m-%d")
        )?;
        match self.return_date {
            Some(returned) => write!(f, ", returned {}", returned.format("%Y-%m-%d")),
            None => Ok(()),
        }
    }
}
