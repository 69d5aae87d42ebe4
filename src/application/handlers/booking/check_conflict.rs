//! CheckConflictHandler - answers "is this start still free?".

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::Scheduler;
use crate::domain::scheduling::{BookingError, DaySchedule};

#[derive(Debug, Clone)]
pub struct CheckConflictQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<NaiveTime>,
    /// False when the time is free but not a candidate start of the day.
    pub bookable: bool,
}

pub struct CheckConflictHandler {
    scheduler: Scheduler,
}

impl CheckConflictHandler {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    pub async fn handle(&self, query: CheckConflictQuery) -> Result<ConflictCheck, BookingError> {
        let service = self.scheduler.resolve_service(&query.service).await?;
        let plan = self.scheduler.day_plan(&service, query.date).await?;

        if let DaySchedule::Closed { weekday } = plan.schedule {
            return Err(BookingError::Closed {
                date: query.date,
                weekday,
            });
        }

        let calendar = self.scheduler.calendar();
        let has_conflict = plan.resolver(calendar).has_conflict(query.time);
        let bookable = !has_conflict && plan.schedule.offers(query.time);
        let next_available = if bookable {
            None
        } else {
            plan.next_available(calendar, query.time)
        };

        Ok(ConflictCheck {
            has_conflict,
            next_available,
            bookable,
        })
    }
}
