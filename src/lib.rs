//! Library Manager
//!
//! Tracks a library's books, registered users, loans and reservations in
//! memory and persists the whole registry to a single JSON file.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::JsonFileStore;
pub use services::{LibraryReport, LibraryService};
