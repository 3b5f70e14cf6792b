//! Closed validity windows

use chrono::{DateTime, Utc};

/// A closed interval `[start, end]` of time.
///
/// A missing bound leaves that side open: a window without `end` is valid
/// for any time at or after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Window valid at every point in time
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether `time` lies inside the window, bounds included
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| start <= time) && self.end.map_or(true, |end| time <= end)
    }
}
