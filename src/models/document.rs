//! On-disk JSON document and its mapping to the registry state
//!
//! The records below are the file format. They are converted to and from the
//! domain types by plain functions so the domain never depends on serde, and
//! the conversion back is where a loaded file gets validated.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::{book::Book, library::LibraryState, loan::Loan, user::User};

/// Whole library file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryDocument {
    pub next_user_id: u32,
    pub books: Vec<BookRecord>,
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    pub available_copies: u32,
    pub reservation_queue: Vec<u32>,
    #[serde(default)]
    pub held_for: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    pub id: u32,
    pub name: String,
    pub loans: Vec<LoanRecord>,
}

/// Loan as stored under its user; the user id is implied by nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanRecord {
    pub book_title: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            reservation_queue: book.reservation_queue.iter().copied().collect(),
            held_for: book.held_for.iter().copied().collect(),
        }
    }
}

impl From<&Loan> for LoanRecord {
    fn from(loan: &Loan) -> Self {
        Self {
            book_title: loan.book_title.clone(),
            issue_date: loan.issue_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            loans: user.loans.iter().map(LoanRecord::from).collect(),
        }
    }
}

impl From<&LibraryState> for LibraryDocument {
    fn from(state: &LibraryState) -> Self {
        Self {
            next_user_id: state.next_user_id,
            books: state.books.values().map(BookRecord::from).collect(),
            users: state.users.values().map(UserRecord::from).collect(),
        }
    }
}

impl LoanRecord {
    fn into_loan(self, user_id: u32) -> Result<Loan, String> {
        if self.due_date < self.issue_date {
            return Err(format!(
                "loan of '{}' for user {} is due before it was issued",
                self.book_title, user_id
            ));
        }
        if let Some(returned) = self.return_date {
            if returned < self.issue_date {
                return Err(format!(
                    "loan of '{}' for user {} was returned before it was issued",
                    self.book_title, user_id
                ));
            }
        }
        Ok(Loan {
            book_title: self.book_title,
            user_id,
            issue_date: self.issue_date,
            due_date: self.due_date,
            return_date: self.return_date,
        })
    }
}

impl LibraryDocument {
    /// Rebuild the registry state, rejecting anything the registry itself
    /// could never have produced.
    pub fn into_state(self) -> Result<LibraryState, String> {
        if self.next_user_id == 0 {
            return Err("next_user_id must be at least 1".to_string());
        }

        let mut users = BTreeMap::new();
        for record in self.users {
            if record.id == 0 || record.id >= self.next_user_id {
                return Err(format!(
                    "user id {} is outside the issued range 1..{}",
                    record.id, self.next_user_id
                ));
            }
            let user_id = record.id;
            let loans = record
                .loans
                .into_iter()
                .map(|loan| loan.into_loan(user_id))
                .collect::<Result<Vec<_>, _>>()?;
            let user = User {
                id: user_id,
                name: record.name,
                loans,
            };
            if users.insert(user_id, user).is_some() {
                return Err(format!("duplicate user id {}", user_id));
            }
        }

        let mut active_by_title: HashMap<String, u64> = HashMap::new();
        for loan in users.values().flat_map(|user| user.active_loans()) {
            *active_by_title.entry(loan.book_title.clone()).or_default() += 1;
        }

        let mut books = IndexMap::new();
        for record in self.books {
            check_user_list(
                &record.title,
                "reservation queue",
                &record.reservation_queue,
                &users,
            )?;
            check_user_list(&record.title, "hold list", &record.held_for, &users)?;
            check_queue_consistency(&record)?;

            let on_loan = active_by_title.remove(record.title.as_str()).unwrap_or(0);
            let accounted = u64::from(record.available_copies)
                + record.held_for.len() as u64
                + on_loan;
            if accounted != u64::from(record.total_copies) {
                return Err(format!(
                    "'{}' has {} copies but {} available, {} on hold and {} on loan",
                    record.title,
                    record.total_copies,
                    record.available_copies,
                    record.held_for.len(),
                    on_loan
                ));
            }

            let book = Book {
                title: record.title.clone(),
                author: record.author,
                total_copies: record.total_copies,
                available_copies: record.available_copies,
                reservation_queue: VecDeque::from(record.reservation_queue),
                held_for: VecDeque::from(record.held_for),
            };
            if books.insert(record.title.clone(), book).is_some() {
                return Err(format!("duplicate book title '{}'", record.title));
            }
        }

        if let Some(title) = active_by_title.keys().next() {
            return Err(format!("active loan references unknown book '{}'", title));
        }

        Ok(LibraryState {
            books,
            users,
            next_user_id: self.next_user_id,
        })
    }
}

fn check_user_list(
    title: &str,
    list_name: &str,
    ids: &[u32],
    users: &BTreeMap<u32, User>,
) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !users.contains_key(id) {
            return Err(format!("{} of '{}' names unknown user {}", list_name, title, id));
        }
        if !seen.insert(*id) {
            return Err(format!("{} of '{}' lists user {} twice", list_name, title, id));
        }
    }
    Ok(())
}

/// Users only queue while the shelf is empty, and a held copy ends a user's
/// wait.
fn check_queue_consistency(record: &BookRecord) -> Result<(), String> {
    if !record.reservation_queue.is_empty() && record.available_copies > 0 {
        return Err(format!(
            "'{}' has {} waiting reservations while {} copies are on the shelf",
            record.title,
            record.reservation_queue.len(),
            record.available_copies
        ));
    }
    if let Some(id) = record
        .reservation_queue
        .iter()
        .find(|id| record.held_for.contains(id))
    {
        return Err(format!(
            "user {} is both queued for and holding a copy of '{}'",
            id, record.title
        ));
    }
    Ok(())
}
