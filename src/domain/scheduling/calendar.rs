//! Business-timezone calendar arithmetic.
//!
//! All weekday and "today" decisions are made in the shop's timezone, never
//! in UTC, so a booking at 22:00 local time does not land on the next day.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Calendar anchored to the business timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
}

impl BusinessCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Builds a calendar from an IANA timezone name such as `America/Sao_Paulo`.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ValidationError::invalid_format("timezone", format!("unknown timezone '{}'", name)))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The local calendar date at `now`.
    pub fn today(&self, now: Timestamp) -> NaiveDate {
        self.local_date(now.as_datetime())
    }

    pub fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn local_time(&self, instant: &DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.tz).time()
    }

    /// Converts a local wall-clock date and time to UTC.
    ///
    /// Times skipped by a DST jump are rejected; for repeated times the
    /// earlier instant wins.
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, ValidationError> {
        self.resolve(date.and_time(time)).ok_or_else(|| {
            ValidationError::invalid_format(
                "time",
                format!("{} {} does not exist in {}", date, time.format("%H:%M"), self.tz),
            )
        })
    }

    /// UTC half-open range `[start, end)` covering the local day.
    pub fn day_bounds(&self, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
        let next = date
            .succ_opt()
            .ok_or_else(|| ValidationError::invalid_format("date", "date out of range"))?;
        Ok((self.start_of_day(date)?, self.start_of_day(next)?))
    }

    fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, ValidationError> {
        // Some zones historically started DST at midnight, so the day begins at 01:00.
        (0..3)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .find_map(|time| self.resolve(date.and_time(time)))
            .ok_or_else(|| ValidationError::invalid_format("date", format!("{} has no local midnight", date)))
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }
}

/// Parses an API date in `YYYY-MM-DD` form.
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
}

/// Parses an API time in `HH:MM` form.
pub fn parse_booking_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ValidationError::invalid_format("time", "expected HH:MM"))
}

/// Portuguese weekday name used in customer-facing replies.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Minutes since local midnight, ignoring seconds.
pub(crate) fn minute_of_day(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minute_of_day`]; `None` at or past midnight.
pub(crate) fn time_from_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).filter(|_| minute < 24 * 60)
}
