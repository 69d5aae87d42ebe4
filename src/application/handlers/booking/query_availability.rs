//! QueryAvailabilityHandler - candidate slots of a day annotated with availability.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::Scheduler;
use crate::domain::scheduling::{BookingError, SlotAvailability};

#[derive(Debug, Clone)]
pub struct QueryAvailabilityQuery {
    pub date: NaiveDate,
    pub service: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalView {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A closed day is reported as `closed: true`, never as an empty slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityView {
    pub date: NaiveDate,
    pub service: String,
    pub closed: bool,
    pub slots: Vec<SlotAvailability>,
    pub work_intervals: Vec<IntervalView>,
}

pub struct QueryAvailabilityHandler {
    scheduler: Scheduler,
}

impl QueryAvailabilityHandler {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    pub async fn handle(&self, query: QueryAvailabilityQuery) -> Result<AvailabilityView, BookingError> {
        let service = self.scheduler.resolve_service(&query.service).await?;
        let plan = self.scheduler.day_plan(&service, query.date).await?;

        let slots = plan
            .resolver(self.scheduler.calendar())
            .annotate(plan.schedule.candidates());
        let work_intervals = plan
            .schedule
            .intervals()
            .iter()
            .map(|i| IntervalView {
                start: i.start(),
                end: i.end(),
            })
            .collect();

        tracing::debug!(
            date = %query.date,
            service = %service.name(),
            closed = plan.schedule.is_closed(),
            candidates = plan.schedule.candidates().len(),
            "Availability computed"
        );

        Ok(AvailabilityView {
            date: query.date,
            service: service.name().to_string(),
            closed: plan.schedule.is_closed(),
            slots,
            work_intervals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::scheduling::{Appointment, Service};

    fn query(service: &str, date: NaiveDate) -> QueryAvailabilityQuery {
        QueryAvailabilityQuery {
            date,
            service: service.to_string(),
        }
    }

    #[tokio::test]
    async fn lists_candidates_within_both_intervals() {
        let fx = Fixture::new();
        let handler = QueryAvailabilityHandler::new(fx.scheduler.clone());
        let view = handler.handle(query("Corte", wednesday())).await.unwrap();

        assert!(!view.closed);
        assert_eq!(view.work_intervals.len(), 2);
        let times: Vec<NaiveTime> = view.slots.iter().map(|s| s.time).collect();
        assert_eq!(times.first(), Some(&hm(9, 0)));
        assert!(times.contains(&hm(11, 30)));
        assert!(!times.contains(&hm(11, 45)));
        assert!(times.contains(&hm(14, 0)));
        assert_eq!(times.last(), Some(&hm(17, 30)));
        assert!(view.slots.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn booked_windows_are_marked_unavailable() {
        let fx = Fixture::new();
        let client = fx.register("Ana Souza").await;
        let corte = Service::new("Corte", 3500, 30).unwrap();
        let start = fx.scheduler.calendar().to_utc(wednesday(), hm(10, 0)).unwrap();
        fx.appointments
            .insert_unchecked(Appointment::schedule(
                client.id,
                &corte,
                Timestamp::from_datetime(start),
                fx.scheduler.now(),
            ))
            .await;

        let view = QueryAvailabilityHandler::new(fx.scheduler.clone())
            .handle(query("Corte", wednesday()))
            .await
            .unwrap();
        let taken: Vec<NaiveTime> = view
            .slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.time)
            .collect();

        assert_eq!(taken, vec![hm(9, 45), hm(10, 0), hm(10, 15)]);
    }

    #[tokio::test]
    async fn closed_day_is_flagged() {
        let fx = Fixture::new();
        let view = QueryAvailabilityHandler::new(fx.scheduler.clone())
            .handle(query("Corte", sunday()))
            .await
            .unwrap();
        assert!(view.closed);
        assert!(view.slots.is_empty());
        assert!(view.work_intervals.is_empty());
    }

    #[tokio::test]
    async fn repeated_queries_are_identical() {
        let fx = Fixture::new();
        let handler = QueryAvailabilityHandler::new(fx.scheduler.clone());
        let first = handler.handle(query("Barba", wednesday())).await.unwrap();
        let second = handler.handle(query("Barba", wednesday())).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let fx = Fixture::new();
        let err = QueryAvailabilityHandler::new(fx.scheduler.clone())
            .handle(query("Luzes", wednesday()))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::service_not_found("Luzes"));
    }
}
