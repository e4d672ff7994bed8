//! In-memory registry state

use indexmap::IndexMap;
use std::collections::BTreeMap;

use super::{book::Book, user::User};

/// Everything the registry owns.
///
/// Books keep catalogue (insertion) order; users iterate by id, which is also
/// registration order since ids are handed out sequentially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryState {
    pub books: IndexMap<String, Book>,
    pub users: BTreeMap<u32, User>,
    pub next_user_id: u32,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self {
            books: IndexMap::new(),
            users: BTreeMap::new(),
            next_user_id: 1,
        }
    }
}
