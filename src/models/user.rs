//! User model

use std::fmt;

use super::loan::Loan;

/// A registered borrower and their full loan history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub loans: Vec<Loan>,
}

impl User {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            loans: Vec::new(),
        }
    }

    pub fn active_loans(&self) -> impl Iterator<Item = &Loan> + '_ {
        self.loans.iter().filter(|loan| loan.is_active())
    }

    pub fn has_active_loans(&self) -> bool {
        self.loans.iter().any(Loan::is_active)
    }

    /// Oldest unreturned loan of `title`
    pub(crate) fn active_loan_mut(&mut self, title: &str) -> Option<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|loan| loan.is_active() && loan.book_title == title)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({} on loan, {} total)",
            self.id,
            self.name,
            self.active_loans().count(),
            self.loans.len()
        )
    }
}
