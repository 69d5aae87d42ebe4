//! Working-hour intervals.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::calendar::minute_of_day;
use crate::domain::foundation::ValidationError;

/// A contiguous span of a weekday during which bookings are accepted.
///
/// A weekday may have several intervals (morning and afternoon shifts);
/// inactive intervals are kept for the admin but never produce slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInterval {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    active: bool,
}

impl WorkInterval {
    pub fn new(
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        active: bool,
    ) -> Result<Self, ValidationError> {
        if minute_of_day(start) >= minute_of_day(end) {
            return Err(ValidationError::invalid_format(
                "work_interval",
                format!(
                    "start {} must be before end {}",
                    start.format("%H:%M"),
                    end.format("%H:%M")
                ),
            ));
        }
        Ok(Self {
            weekday,
            start,
            end,
            active,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True when the interval is active and falls on the date's weekday.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.active && date.weekday() == self.weekday
    }

    /// True when `[start, start + duration)` lies inside the interval.
    pub fn contains(&self, start: NaiveTime, duration_minutes: u32) -> bool {
        let begin = minute_of_day(start);
        begin >= minute_of_day(self.start) && begin + duration_minutes <= minute_of_day(self.end)
    }
}
