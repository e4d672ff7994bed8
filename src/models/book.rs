//! Book model

use std::collections::VecDeque;
use std::fmt;

/// A title in the catalogue together with its copy counts.
///
/// Copies are in exactly one of three places: on the shelf
/// (`available_copies`), set aside for a reserving user (`held_for`), or out
/// on loan. The on-loan count is never stored, it is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    pub available_copies: u32,
    /// Users waiting for a copy, front is served first.
    pub reservation_queue: VecDeque<u32>,
    /// Users promoted out of the queue, one held copy each.
    pub held_for: VecDeque<u32>,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, copies: u32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            total_copies: copies,
            available_copies: copies,
            reservation_queue: VecDeque::new(),
            held_for: VecDeque::new(),
        }
    }

    /// Number of copies held for reserving users
    pub fn held_copies(&self) -> u32 {
        u32::try_from(self.held_for.len()).unwrap_or(u32::MAX)
    }

    /// Copies currently in a borrower's hands
    pub fn copies_on_loan(&self) -> u32 {
        self.total_copies
            .saturating_sub(self.available_copies)
            .saturating_sub(self.held_copies())
    }

    /// True when any copy is off the shelf, whether on loan or on hold.
    pub fn is_in_use(&self) -> bool {
        self.available_copies < self.total_copies
    }

    pub fn is_queued(&self, user_id: u32) -> bool {
        self.reservation_queue.contains(&user_id)
    }

    pub fn has_hold_for(&self, user_id: u32) -> bool {
        self.held_for.contains(&user_id)
    }

    /// Drop `user_id` from the queue and release any copy held for them.
    ///
    /// A released copy goes to the next user in the queue, or back on the
    /// shelf when nobody is waiting. Returns the user who received the copy.
    pub(crate) fn forget_user(&mut self, user_id: u32) -> Option<u32> {
        self.reservation_queue.retain(|id| *id != user_id);

        let position = self.held_for.iter().position(|id| *id == user_id)?;
        self.held_for.remove(position);
        self.pass_copy_on()
    }

    /// Hand one copy that came back to the library to the front of the queue,
    /// or put it back on the shelf.
    pub(crate) fn pass_copy_on(&mut self) -> Option<u32> {
        match self.reservation_queue.pop_front() {
            Some(next) => {
                self.held_for.push_back(next);
                Some(next)
            }
            None => {
                self.available_copies += 1;
                None
            }
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' by {} ({}/{} available",
            self.title, self.author, self.available_copies, self.total_copies
        )?;
        if !self.held_for.is_empty() {
            write!(f, ", {} on hold", self.held_for.len())?;
        }
        if !self.reservation_queue.is_empty() {
            write!(f, ", {} waiting", self.reservation_queue.len())?;
        }
        write!(f, ")")
    }
}
