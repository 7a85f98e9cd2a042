//! Time sources. Everything that asks "what day is it" goes through [`Clock`].
use chrono::{DateTime, Days, Local};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall clock shifted forward by whole days, for trying out the review queue.
#[derive(Default)]
pub struct SimulatedClock {
    offset_days: Cell<u64>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances current date by one day
    pub fn advance_day(&self) {
        self.offset_days.set(self.offset_days.get() + 1);
        log::info!("Simulated clock moved {} day(s) ahead", self.offset_days.get());
    }

    pub fn offset_days(&self) -> u64 {
        self.offset_days.get()
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> DateTime<Local> {
        let now = Local::now();
        now.checked_add_days(Days::new(self.offset_days.get()))
            .unwrap_or(now)
    }
}

/// A clock that only moves when told to.
pub struct FixedClock {
    now: Cell<DateTime<Local>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Local>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance_days(&self, days: u64) {
        let now = self.now.get();
        self.now
            .set(now.checked_add_days(Days::new(days)).unwrap_or(now));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
