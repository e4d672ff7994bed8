//! Calendar source for issue, due and return dates

use chrono::{Days, Local, NaiveDate};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock. Clones share the same date, so a caller can keep one
/// handle and move time forward under a service that owns another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Rc<Cell<NaiveDate>>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Rc::new(Cell::new(today)),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
    }

    pub fn advance_days(&self, days: u64) {
        let current = self.today.get();
        self.today
            .set(current.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
