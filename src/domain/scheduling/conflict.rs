//! Overlap detection against the day's scheduled appointments.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::calendar::BusinessCalendar;
use super::{Appointment, TimeWindow};

/// A candidate start annotated with whether it is still free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    pub time: NaiveTime,
    pub available: bool,
}

/// Tests candidate slots of one day against the booked windows of that day.
///
/// Only scheduled appointments participate; completed and cancelled ones
/// no longer hold their window.
#[derive(Debug, Clone)]
pub struct ConflictResolver<'a> {
    date: NaiveDate,
    duration_minutes: u32,
    calendar: &'a BusinessCalendar,
    booked: Vec<TimeWindow>,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(
        date: NaiveDate,
        duration_minutes: u32,
        calendar: &'a BusinessCalendar,
        existing: &[Appointment],
    ) -> Self {
        let booked = existing
            .iter()
            .filter(|appt| appt.is_scheduled())
            .map(Appointment::window)
            .collect();
        Self {
            date,
            duration_minutes,
            calendar,
            booked,
        }
    }

    /// Window a booking starting at `time` would occupy, if representable.
    pub fn window_at(&self, time: NaiveTime) -> Option<TimeWindow> {
        self.calendar
            .to_utc(self.date, time)
            .ok()
            .map(|start| TimeWindow::new(start, self.duration_minutes))
    }

    /// True when a booking at `time` would overlap a scheduled appointment.
    ///
    /// A local time that does not exist (DST gap) counts as conflicting.
    pub fn has_conflict(&self, time: NaiveTime) -> bool {
        match self.window_at(time) {
            Some(candidate) => self.booked.iter().any(|booked| booked.overlaps(&candidate)),
            None => true,
        }
    }

    /// First free candidate strictly after `requested`, in slot order.
    ///
    /// The search stays on the requested day; `None` means the rest of the
    /// day is booked.
    pub fn find_alternative(&self, requested: NaiveTime, candidates: &[NaiveTime]) -> Option<NaiveTime> {
        candidates
            .iter()
            .copied()
            .filter(|slot| *slot > requested)
            .find(|slot| !self.has_conflict(*slot))
    }

    /// Annotates every candidate with its availability.
    pub fn annotate(&self, candidates: &[NaiveTime]) -> Vec<SlotAvailability> {
        candidates
            .iter()
            .map(|time| SlotAvailability {
                time: *time,
                available: !self.has_conflict(*time),
            })
            .collect()
    }
}
