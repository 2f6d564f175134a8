//! Wall clock access

use chrono::{DateTime, FixedOffset, Local};

pub trait Clock: Send + Sync {
    /// Current time in the invocation's local offset
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
