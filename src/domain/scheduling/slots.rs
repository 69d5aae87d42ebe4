//! Candidate slot computation from working hours.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use super::calendar::{minute_of_day, time_from_minute, BusinessCalendar};
use super::WorkInterval;
use crate::domain::foundation::Timestamp;

/// Default step between consecutive slot starts.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 15;

/// Candidate starts for one day, or the fact that the shop is closed.
///
/// "Closed" (no active interval on that weekday) and "open but every slot
/// has passed" are different answers and must stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySchedule {
    Closed {
        weekday: Weekday,
    },
    Open {
        intervals: Vec<WorkInterval>,
        candidates: Vec<NaiveTime>,
    },
}

impl DaySchedule {
    pub fn is_closed(&self) -> bool {
        matches!(self, DaySchedule::Closed { .. })
    }

    /// Ordered candidate starts; empty when closed.
    pub fn candidates(&self) -> &[NaiveTime] {
        match self {
            DaySchedule::Closed { .. } => &[],
            DaySchedule::Open { candidates, .. } => candidates,
        }
    }

    /// Active intervals of the day; empty when closed.
    pub fn intervals(&self) -> &[WorkInterval] {
        match self {
            DaySchedule::Closed { .. } => &[],
            DaySchedule::Open { intervals, .. } => intervals,
        }
    }

    pub fn offers(&self, time: NaiveTime) -> bool {
        self.candidates().contains(&time)
    }
}

/// Enumerates candidate start times inside working hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotComputer {
    granularity_minutes: u32,
}

impl SlotComputer {
    pub fn new(granularity_minutes: u32) -> Self {
        Self {
            granularity_minutes: granularity_minutes.max(1),
        }
    }

    pub fn granularity_minutes(&self) -> u32 {
        self.granularity_minutes
    }

    /// Computes the candidate starts of `date` for a service of `duration_minutes`.
    ///
    /// For every active interval on the date's weekday, steps from the
    /// interval start while `slot + duration <= interval.end`. Slots that are
    /// not strictly after `now` are dropped. Results are sorted and deduplicated.
    pub fn compute(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        intervals: &[WorkInterval],
        calendar: &BusinessCalendar,
        now: Timestamp,
    ) -> DaySchedule {
        let mut day_intervals: Vec<WorkInterval> = intervals
            .iter()
            .filter(|interval| interval.applies_to(date))
            .cloned()
            .collect();

        if day_intervals.is_empty() {
            return DaySchedule::Closed {
                weekday: date.weekday(),
            };
        }
        day_intervals.sort_by_key(|interval| interval.start());

        let mut candidates = Vec::new();
        for interval in &day_intervals {
            let end = minute_of_day(interval.end());
            let mut minute = minute_of_day(interval.start());
            while minute + duration_minutes <= end {
                if let Some(slot) = time_from_minute(minute) {
                    let in_future = calendar
                        .to_utc(date, slot)
                        .map(|instant| instant > *now.as_datetime())
                        .unwrap_or(false);
                    if in_future {
                        candidates.push(slot);
                    }
                }
                minute += self.granularity_minutes;
            }
        }
        candidates.sort();
        candidates.dedup();

        DaySchedule::Open {
            intervals: day_intervals,
            candidates,
        }
    }
}

impl Default for SlotComputer {
    fn default() -> Self {
        Self::new(DEFAULT_GRANULARITY_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn calendar() -> BusinessCalendar {
        BusinessCalendar::from_name("America/Sao_Paulo").unwrap()
    }

    fn ts(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc))
    }

    // Monday 2024-01-08
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn long_ago() -> Timestamp {
        ts("2023-12-01T00:00:00Z")
    }

    fn morning() -> WorkInterval {
        WorkInterval::new(Weekday::Mon, hm(9, 0), hm(12, 0), true).unwrap()
    }

    #[test]
    fn monday_morning_thirty_minute_service() {
        let schedule = SlotComputer::default().compute(monday(), 30, &[morning()], &calendar(), long_ago());

        let candidates = schedule.candidates();
        assert_eq!(candidates.first(), Some(&hm(9, 0)));
        assert_eq!(candidates.last(), Some(&hm(11, 30)));
        assert_eq!(candidates.len(), 11);
        assert!(!candidates.contains(&hm(11, 45)));
    }

    #[test]
    fn closed_when_no_active_interval() {
        let inactive = WorkInterval::new(Weekday::Mon, hm(9, 0), hm(12, 0), false).unwrap();
        let tuesday_only = WorkInterval::new(Weekday::Tue, hm(9, 0), hm(12, 0), true).unwrap();

        let schedule = SlotComputer::default().compute(
            monday(),
            30,
            &[inactive, tuesday_only],
            &calendar(),
            long_ago(),
        );

        assert_eq!(schedule, DaySchedule::Closed { weekday: Weekday::Mon });
    }

    #[test]
    fn open_day_with_every_slot_past_is_not_closed() {
        // Monday 15:00 local, after the morning shift.
        let now = ts("2024-01-08T18:00:00Z");
        let schedule = SlotComputer::default().compute(monday(), 30, &[morning()], &calendar(), now);

        assert!(!schedule.is_closed());
        assert!(schedule.candidates().is_empty());
        assert_eq!(schedule.intervals().len(), 1);
    }

    #[test]
    fn today_drops_slots_not_strictly_after_now() {
        // Monday 10:00 local exactly.
        let now = ts("2024-01-08T13:00:00Z");
        let schedule = SlotComputer::default().compute(monday(), 30, &[morning()], &calendar(), now);

        assert_eq!(schedule.candidates().first(), Some(&hm(10, 15)));
    }

    #[test]
    fn merges_multiple_intervals_in_order() {
        let afternoon = WorkInterval::new(Weekday::Mon, hm(14, 0), hm(15, 0), true).unwrap();
        let schedule = SlotComputer::default().compute(
            monday(),
            60,
            &[afternoon, morning()],
            &calendar(),
            long_ago(),
        );

        assert_eq!(
            schedule.candidates(),
            &[hm(9, 0), hm(9, 15), hm(9, 30), hm(9, 45), hm(10, 0), hm(10, 15), hm(10, 30), hm(10, 45), hm(11, 0), hm(14, 0)]
        );
    }

    #[test]
    fn service_longer_than_interval_yields_no_slots() {
        let schedule = SlotComputer::default().compute(monday(), 240, &[morning()], &calendar(), long_ago());
        assert!(!schedule.is_closed());
        assert!(schedule.candidates().is_empty());
    }

    #[test]
    fn computation_is_idempotent() {
        let computer = SlotComputer::default();
        let first = computer.compute(monday(), 45, &[morning()], &calendar(), long_ago());
        let second = computer.compute(monday(), 45, &[morning()], &calendar(), long_ago());
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn every_slot_fits_inside_its_interval(
            start_h in 6u32..12,
            length in 30u32..600,
            duration in 5u32..180,
            granularity in prop::sample::select(vec![5u32, 10, 15, 20, 30]),
        ) {
            let start = hm(start_h, 0);
            let end_minute = (start_h * 60 + length).min(23 * 60 + 59);
            prop_assume!(end_minute > start_h * 60);
            let end = time_from_minute(end_minute).unwrap();
            let interval = WorkInterval::new(Weekday::Mon, start, end, true).unwrap();

            let schedule = SlotComputer::new(granularity)
                .compute(monday(), duration, &[interval.clone()], &calendar(), long_ago());

            for slot in schedule.candidates() {
                prop_assert!(*slot >= interval.start());
                prop_assert!(interval.contains(*slot, duration));
            }
        }
    }
}
