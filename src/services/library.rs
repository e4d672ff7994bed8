//! Library registry: books, users, loans and reservations
//!
//! Every operation validates before it mutates, so a returned error means the
//! state is exactly what it was before the call.

use chrono::{Days, NaiveDate};
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Book, LibraryState, Loan, User},
    repository::JsonFileStore,
    services::{
        clock::{Clock, SystemClock},
        report::LibraryReport,
    },
};

/// Result of handing a book back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    /// The closed loan, with its return date set
    pub loan: Loan,
    /// User at the front of the reservation queue who now has the copy on hold
    pub held_for: Option<u32>,
}

pub struct LibraryService {
    state: LibraryState,
    clock: Box<dyn Clock>,
    loan_period_days: u32,
}

impl LibraryService {
    /// Empty registry dated by the system clock
    pub fn new(loan_period_days: u32) -> Self {
        Self::with_clock(loan_period_days, SystemClock)
    }

    pub fn with_clock(loan_period_days: u32, clock: impl Clock + 'static) -> Self {
        Self {
            state: LibraryState::default(),
            clock: Box::new(clock),
            loan_period_days,
        }
    }

    /// Swap in a whole state, e.g. one read at startup.
    pub fn replace_state(&mut self, state: LibraryState) {
        self.state = state;
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    /// Current date as seen by the registry's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn loan_period_days(&self) -> u32 {
        self.loan_period_days
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.state.books.values()
    }

    pub fn book(&self, title: &str) -> Option<&Book> {
        self.state.books.get(title.trim())
    }

    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.state.users.values()
    }

    pub fn user(&self, id: u32) -> Option<&User> {
        self.state.users.get(&id)
    }

    /// Add a new title with `copies` copies, all on the shelf.
    pub fn add_book(&mut self, title: &str, author: &str, copies: u32) -> AppResult<()> {
        let title = title.trim();
        let author = author.trim();

        if title.is_empty() {
            return Err(AppError::InvalidArgument("title must not be empty".to_string()));
        }
        if author.is_empty() {
            return Err(AppError::InvalidArgument("author must not be empty".to_string()));
        }
        if copies == 0 {
            return Err(AppError::InvalidArgument(
                "a book needs at least one copy".to_string(),
            ));
        }
        if self.state.books.contains_key(title) {
            return Err(AppError::DuplicateTitle(title.to_string()));
        }

        self.state
            .books
            .insert(title.to_string(), Book::new(title, author, copies));
        tracing::info!("Added book '{}' by {} ({} copies)", title, author, copies);
        Ok(())
    }

    /// Remove a title. Refused while any copy is on loan or on hold.
    ///
    /// Reservations only exist while the shelf is empty, so a book with a
    /// waiting queue is always in use and is never removed.
    pub fn remove_book(&mut self, title: &str) -> AppResult<Book> {
        let title = title.trim();
        let book = self
            .state
            .books
            .get(title)
            .ok_or_else(|| not_found_book(title))?;

        if book.is_in_use() {
            tracing::debug!(
                "Refusing to remove '{}': {} on loan, {} on hold, {} waiting",
                title,
                book.copies_on_loan(),
                book.held_copies(),
                book.reservation_queue.len()
            );
            return Err(AppError::BookInUse(title.to_string()));
        }

        let book = self
            .state
            .books
            .shift_remove(title)
            .ok_or_else(|| not_found_book(title))?;
        tracing::info!("Removed book '{}'", title);
        Ok(book)
    }

    /// Register a user and return the id assigned to them.
    pub fn add_user(&mut self, name: &str) -> AppResult<u32> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidArgument("name must not be empty".to_string()));
        }

        let id = self.state.next_user_id;
        let next = id.checked_add(1).ok_or_else(|| {
            AppError::InvalidArgument("user id space exhausted".to_string())
        })?;

        self.state.users.insert(id, User::new(id, name));
        self.state.next_user_id = next;
        tracing::info!("Registered user {} ({})", id, name);
        Ok(id)
    }

    /// Remove a user without unreturned loans.
    ///
    /// The user leaves every reservation queue; a copy held for them goes to
    /// the next reserver or back on the shelf.
    pub fn remove_user(&mut self, id: u32) -> AppResult<User> {
        let user = self.state.users.get(&id).ok_or_else(|| not_found_user(id))?;
        if user.has_active_loans() {
            return Err(AppError::UserHasActiveLoans(id));
        }

        for book in self.state.books.values_mut() {
            let had_hold = book.has_hold_for(id);
            let promoted = book.forget_user(id);
            if had_hold {
                match promoted {
                    Some(next) => tracing::info!(
                        "Copy of '{}' held for user {} now held for user {}",
                        book.title,
                        id,
                        next
                    ),
                    None => tracing::info!(
                        "Copy of '{}' held for user {} returned to the shelf",
                        book.title,
                        id
                    ),
                }
            }
        }

        let user = self
            .state
            .users
            .remove(&id)
            .ok_or_else(|| not_found_user(id))?;
        tracing::info!("Removed user {} ({})", id, user.name);
        Ok(user)
    }

    /// Lend one copy of `title` to `user_id`.
    ///
    /// A copy held for the user is used first; otherwise a shelf copy is
    /// taken. Fails with `NoCopiesAvailable` when neither exists.
    pub fn borrow_book(&mut self, user_id: u32, title: &str) -> AppResult<Loan> {
        let title = title.trim();
        let today = self.clock.today();

        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| not_found_user(user_id))?;
        let book = self
            .state
            .books
            .get_mut(title)
            .ok_or_else(|| not_found_book(title))?;

        let hold = book.held_for.iter().position(|id| *id == user_id);
        if hold.is_none() && book.available_copies == 0 {
            return Err(AppError::NoCopiesAvailable(title.to_string()));
        }

        let due_date = today
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .ok_or_else(|| AppError::InvalidArgument("due date out of range".to_string()))?;

        match hold {
            Some(position) => {
                book.held_for.remove(position);
            }
            None => book.available_copies -= 1,
        }

        let loan = Loan {
            book_title: book.title.clone(),
            user_id,
            issue_date: today,
            due_date,
            return_date: None,
        };
        user.loans.push(loan.clone());

        tracing::info!(
            "User {} borrowed '{}', due {}",
            user_id,
            title,
            due_date.format("%Y-%m-%d")
        );
        Ok(loan)
    }

    /// Close the user's oldest active loan of `title`.
    ///
    /// With an empty reservation queue the copy goes back on the shelf.
    /// Otherwise the first queued user is promoted and the copy is held for
    /// them.
    pub fn return_book(&mut self, user_id: u32, title: &str) -> AppResult<ReturnOutcome> {
        let title = title.trim();
        let today = self.clock.today();

        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| not_found_user(user_id))?;
        let loan = user.active_loan_mut(title).ok_or_else(|| {
            AppError::NotFound(format!(
                "user {} has no active loan of '{}'",
                user_id, title
            ))
        })?;
        let book = self
            .state
            .books
            .get_mut(title)
            .ok_or_else(|| not_found_book(title))?;

        loan.return_date = Some(today);
        let loan = loan.clone();
        let held_for = book.pass_copy_on();

        if loan.was_returned_late() {
            tracing::info!(
                "User {} returned '{}' {} days late",
                user_id,
                title,
                (today - loan.due_date).num_days()
            );
        } else {
            tracing::info!("User {} returned '{}'", user_id, title);
        }
        if let Some(next) = held_for {
            tracing::info!("Copy of '{}' held for user {}", title, next);
        }

        Ok(ReturnOutcome { loan, held_for })
    }

    /// Queue `user_id` for `title` and return their 1-based position.
    ///
    /// Reservations are only taken while no copy is on the shelf.
    pub fn reserve_book(&mut self, user_id: u32, title: &str) -> AppResult<usize> {
        let title = title.trim();

        if !self.state.users.contains_key(&user_id) {
            return Err(not_found_user(user_id));
        }
        let book = self
            .state
            .books
            .get_mut(title)
            .ok_or_else(|| not_found_book(title))?;

        if book.is_queued(user_id) || book.has_hold_for(user_id) {
            return Err(AppError::AlreadyReserved {
                user_id,
                title: title.to_string(),
            });
        }
        if book.available_copies > 0 {
            return Err(AppError::CopiesAvailable(title.to_string()));
        }

        book.reservation_queue.push_back(user_id);
        let position = book.reservation_queue.len();
        tracing::info!(
            "User {} reserved '{}' (position {})",
            user_id,
            title,
            position
        );
        Ok(position)
    }

    /// Overdue loans across all users, by user id then borrow order.
    pub fn overdue_loans(&self) -> impl Iterator<Item = &Loan> + '_ {
        let today = self.clock.today();
        self.state
            .users
            .values()
            .flat_map(|user| user.loans.iter())
            .filter(move |loan| loan.is_overdue(today))
    }

    pub fn generate_report(&self) -> LibraryReport {
        LibraryReport::from_state(&self.state, self.clock.today())
    }

    pub fn save_to_file(&self, path: &Path) -> AppResult<()> {
        JsonFileStore::new(path).save(&self.state)?;
        tracing::info!("Library saved to {}", path.display());
        Ok(())
    }

    /// Replace the registry with the contents of `path`.
    ///
    /// The file is fully parsed and validated before anything is swapped in;
    /// on error the current state is kept.
    pub fn load_from_file(&mut self, path: &Path) -> AppResult<()> {
        let state = JsonFileStore::new(path).load()?;
        self.replace_state(state);
        tracing::info!(
            "Library loaded from {} ({} books, {} users)",
            path.display(),
            self.state.books.len(),
            self.state.users.len()
        );
        Ok(())
    }
}

fn not_found_book(title: &str) -> AppError {
    AppError::NotFound(format!("no book titled '{}'", title))
}

fn not_found_user(id: u32) -> AppError {
    AppError::NotFound(format!("no user with id {}", id))
}
