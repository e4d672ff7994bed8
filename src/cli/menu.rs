//! Numbered menu actions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddBook,
    RemoveBook,
    AddUser,
    RemoveUser,
    BorrowBook,
    ReturnBook,
    ReserveBook,
    ListBooks,
    ListUsers,
    OverdueLoans,
    Report,
    Save,
    Reload,
    Exit,
}

impl MenuAction {
    /// Display order of the menu
    pub const ALL: [MenuAction; 14] = [
        MenuAction::AddBook,
        MenuAction::RemoveBook,
        MenuAction::AddUser,
        MenuAction::RemoveUser,
        MenuAction::BorrowBook,
        MenuAction::ReturnBook,
        MenuAction::ReserveBook,
        MenuAction::ListBooks,
        MenuAction::ListUsers,
        MenuAction::OverdueLoans,
        MenuAction::Report,
        MenuAction::Save,
        MenuAction::Reload,
        MenuAction::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuAction::AddBook => 1,
            MenuAction::RemoveBook => 2,
            MenuAction::AddUser => 3,
            MenuAction::RemoveUser => 4,
            MenuAction::BorrowBook => 5,
            MenuAction::ReturnBook => 6,
            MenuAction::ReserveBook => 7,
            MenuAction::ListBooks => 8,
            MenuAction::ListUsers => 9,
            MenuAction::OverdueLoans => 10,
            MenuAction::Report => 11,
            MenuAction::Save => 12,
            MenuAction::Reload => 13,
            MenuAction::Exit => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddBook => "Add book",
            MenuAction::RemoveBook => "Remove book",
            MenuAction::AddUser => "Add user",
            MenuAction::RemoveUser => "Remove user",
            MenuAction::BorrowBook => "Borrow book",
            MenuAction::ReturnBook => "Return book",
            MenuAction::ReserveBook => "Reserve book",
            MenuAction::ListBooks => "List books",
            MenuAction::ListUsers => "List users",
            MenuAction::OverdueLoans => "Overdue loans",
            MenuAction::Report => "Generate report",
            MenuAction::Save => "Save",
            MenuAction::Reload => "Reload from file",
            MenuAction::Exit => "Exit",
        }
    }

    /// Parse the user's menu choice
    pub fn from_choice(choice: &str) -> Option<Self> {
        let number: u8 = choice.trim().parse().ok()?;
        Self::ALL.into_iter().find(|action| action.number() == number)
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}. {}", self.number(), self.label())
    }
}
