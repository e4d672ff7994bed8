//! Interactive text menu over the library registry
//!
//! The menu only gathers input and prints results; every decision is made by
//! [`LibraryService`].

pub mod menu;
pub mod prompt;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{
    error::{AppError, AppResult},
    repository::JsonFileStore,
    services::LibraryService,
};

pub use menu::MenuAction;
pub use prompt::Prompter;

enum Flow {
    Continue,
    Exit,
    EndOfInput,
}

/// Fill `library` from the data file at startup.
///
/// A missing file is a fresh library. An unreadable or corrupt file is logged
/// and the library starts empty; a corrupt file is copied aside first so the
/// save on exit cannot overwrite it.
pub fn restore_library(library: &mut LibraryService, store: &JsonFileStore) {
    match store.load_if_exists() {
        Ok(Some(state)) => {
            tracing::info!(
                "Loaded {} books and {} users from {}",
                state.books.len(),
                state.users.len(),
                store.path().display()
            );
            library.replace_state(state);
        }
        Ok(None) => {
            tracing::info!(
                "No library file at {}, starting empty",
                store.path().display()
            );
        }
        Err(e @ AppError::CorruptFile { .. }) => {
            tracing::warn!("{}, starting with an empty library", e);
            match store.quarantine() {
                Ok(copy) => tracing::warn!("Corrupt file copied to {}", copy.display()),
                Err(e) => tracing::warn!("Could not copy corrupt file aside: {}", e),
            }
        }
        Err(e) => {
            tracing::warn!("{}, starting with an empty library", e);
        }
    }
}

/// Run the menu until the user exits or input ends, then save to `data_file`.
pub fn run<R: BufRead, W: Write>(
    library: &mut LibraryService,
    data_file: &Path,
    input: R,
    output: W,
) -> io::Result<()> {
    let mut session = Session {
        library,
        data_file: data_file.to_path_buf(),
        prompter: Prompter::new(input, output),
    };
    session.run()
}

struct Session<'a, R, W> {
    library: &'a mut LibraryService,
    data_file: PathBuf,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompter.ask("Choose an option")? else {
                return self.end_of_input();
            };

            let Some(action) = MenuAction::from_choice(&choice) else {
                self.prompter
                    .say(format!("Unknown option '{}'", choice.trim()))?;
                continue;
            };

            tracing::debug!("Menu action: {:?}", action);
            match self.dispatch(action)? {
                Flow::Continue => {}
                Flow::Exit => return Ok(()),
                Flow::EndOfInput => return self.end_of_input(),
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.prompter.say("")?;
        self.prompter.say("=== Library Manager ===")?;
        for action in MenuAction::ALL {
            self.prompter.say(action)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: MenuAction) -> io::Result<Flow> {
        match action {
            MenuAction::AddBook => self.add_book(),
            MenuAction::RemoveBook => self.remove_book(),
            MenuAction::AddUser => self.add_user(),
            MenuAction::RemoveUser => self.remove_user(),
            MenuAction::BorrowBook => self.borrow_book(),
            MenuAction::ReturnBook => self.return_book(),
            MenuAction::ReserveBook => self.reserve_book(),
            MenuAction::ListBooks => self.list_books(),
            MenuAction::ListUsers => self.list_users(),
            MenuAction::OverdueLoans => self.overdue_loans(),
            MenuAction::Report => {
                let report = self.library.generate_report();
                self.prompter.say(report)?;
                Ok(Flow::Continue)
            }
            MenuAction::Save => {
                let result = self
                    .library
                    .save_to_file(&self.data_file)
                    .map(|()| format!("Saved to {}", self.data_file.display()));
                self.show(result)?;
                Ok(Flow::Continue)
            }
            MenuAction::Reload => {
                let result = self
                    .library
                    .load_from_file(&self.data_file)
                    .map(|()| format!("Reloaded from {}", self.data_file.display()));
                self.show(result)?;
                Ok(Flow::Continue)
            }
            MenuAction::Exit => {
                self.exit()?;
                Ok(Flow::Exit)
            }
        }
    }

    fn add_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompter.ask("Title")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(author) = self.prompter.ask("Author")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(copies) = self.prompter.ask("Copies")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = parse_number::<u32>(&copies, "copies").and_then(|copies| {
            self.library
                .add_book(&title, &author, copies)
                .map(|()| format!("Added '{}' ({} copies)", title.trim(), copies))
        });
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompter.ask("Title")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = self
            .library
            .remove_book(&title)
            .map(|book| format!("Removed {}", book));
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn add_user(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompter.ask("Name")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = self
            .library
            .add_user(&name)
            .map(|id| format!("Registered {} with id {}", name.trim(), id));
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn remove_user(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompter.ask("User id")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = parse_number::<u32>(&id, "user id").and_then(|id| {
            self.library
                .remove_user(id)
                .map(|user| format!("Removed user #{} {}", user.id, user.name))
        });
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn borrow_book(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompter.ask("User id")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(title) = self.prompter.ask("Title")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = parse_number::<u32>(&id, "user id").and_then(|id| {
            self.library.borrow_book(id, &title).map(|loan| {
                format!(
                    "Borrowed '{}', due {}",
                    loan.book_title,
                    loan.due_date.format("%Y-%m-%d")
                )
            })
        });
        if let Err(AppError::NoCopiesAvailable(_)) = &result {
            self.prompter
                .say("All copies are out, choose 'Reserve book' to join the waiting list.")?;
        }
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompter.ask("User id")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(title) = self.prompter.ask("Title")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = parse_number::<u32>(&id, "user id").and_then(|id| {
            self.library.return_book(id, &title).map(|outcome| {
                let mut message = format!("Returned '{}'", outcome.loan.book_title);
                if outcome.loan.was_returned_late() {
                    message.push_str(" (late)");
                }
                if let Some(next) = outcome.held_for {
                    message.push_str(&format!(", copy now held for user {}", next));
                }
                message
            })
        });
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn reserve_book(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompter.ask("User id")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(title) = self.prompter.ask("Title")? else {
            return Ok(Flow::EndOfInput);
        };

        let result = parse_number::<u32>(&id, "user id").and_then(|id| {
            self.library.reserve_book(id, &title).map(|position| {
                format!("Reserved '{}', position {} in line", title.trim(), position)
            })
        });
        self.show(result)?;
        Ok(Flow::Continue)
    }

    fn list_books(&mut self) -> io::Result<Flow> {
        let lines: Vec<String> = self
            .library
            .books()
            .map(|book| format!("  {}", book))
            .collect();
        if lines.is_empty() {
            self.prompter.say("No books in the catalogue.")?;
        }
        for line in lines {
            self.prompter.say(line)?;
        }
        Ok(Flow::Continue)
    }

    fn list_users(&mut self) -> io::Result<Flow> {
        let mut lines = Vec::new();
        for user in self.library.users() {
            lines.push(format!("  {}", user));
            lines.extend(user.active_loans().map(|loan| format!("      {}", loan)));
        }
        if lines.is_empty() {
            self.prompter.say("No registered users.")?;
        }
        for line in lines {
            self.prompter.say(line)?;
        }
        Ok(Flow::Continue)
    }

    fn overdue_loans(&mut self) -> io::Result<Flow> {
        let today = self.library.today();
        let lines: Vec<String> = self
            .library
            .overdue_loans()
            .map(|loan| format!("  {} ({} days overdue)", loan, loan.days_overdue(today)))
            .collect();
        if lines.is_empty() {
            self.prompter.say("No overdue loans.")?;
        }
        for line in lines {
            self.prompter.say(line)?;
        }
        Ok(Flow::Continue)
    }

    /// Input closed: behave like an explicit exit.
    fn end_of_input(&mut self) -> io::Result<()> {
        self.prompter.say("")?;
        self.exit()
    }

    fn exit(&mut self) -> io::Result<()> {
        let result = self
            .library
            .save_to_file(&self.data_file)
            .map(|()| format!("Saved to {}. Goodbye!", self.data_file.display()));
        self.show(result)
    }

    fn show(&mut self, result: AppResult<String>) -> io::Result<()> {
        match result {
            Ok(message) => self.prompter.say(message),
            Err(e) => {
                tracing::debug!("Operation failed: {:?}", e);
                self.prompter.say(format!("Error: {}", e))
            }
        }
    }
}

fn parse_number<T: FromStr>(raw: &str, what: &str) -> AppResult<T> {
    raw.trim().parse().map_err(|_| {
        AppError::InvalidArgument(format!("{} must be a whole number, got '{}'", what, raw.trim()))
    })
}
