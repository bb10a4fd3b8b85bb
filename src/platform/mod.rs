//! Platform abstraction layer
//!
//! Time is read through `ClockSource` so the frame loop can run against the
//! system clock (browser or native) or a hand-driven clock in tests.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime};

/// Source of the current local time
pub trait ClockSource {
    /// Current instant with the local UTC offset
    fn now(&self) -> DateTime<FixedOffset>;

    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Local wall-clock time
    fn local(&self) -> NaiveDateTime {
        self.now().naive_local()
    }
}

/// Local time from the host; on wasm32 chrono reads it from `Date`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Settable clock; clones share the same time
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<FixedOffset>) {
        self.current.set(instant);
    }

    /// Move forward (or backward, for a negative step)
    pub fn advance(&self, step: Duration) {
        self.current.set(self.current.get() + step);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.current.get()
    }
}
