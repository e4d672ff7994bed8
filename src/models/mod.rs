//! Data models for the library registry

pub mod book;
pub mod document;
pub mod library;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use document::LibraryDocument;
pub use library::LibraryState;
pub use loan::Loan;
pub use user::User;
