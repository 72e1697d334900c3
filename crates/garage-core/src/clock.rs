//! Source of the current year for model-year checks

use chrono::Datelike;

pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Reads the year from the system clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Utc::now().year()
    }
}

/// Always reports the same year
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
