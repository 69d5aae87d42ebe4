//! Shared read path for availability, conflict checks and booking.

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::scheduling::{
    Appointment, BookingError, BusinessCalendar, ConflictResolver, DaySchedule, Service,
    SlotComputer, WorkInterval,
};
use crate::ports::{AppointmentStore, Clock, ServiceCatalog, WorkingHoursCatalog};

/// Resolves services and builds a day's schedule against current bookings.
#[derive(Clone)]
pub struct Scheduler {
    services: Arc<dyn ServiceCatalog>,
    hours: Arc<dyn WorkingHoursCatalog>,
    appointments: Arc<dyn AppointmentStore>,
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
    slots: SlotComputer,
}

/// Candidate slots and scheduled appointments of one day for one service.
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub service: Service,
    pub schedule: DaySchedule,
    pub booked: Vec<Appointment>,
}

impl DayPlan {
    pub fn resolver<'a>(&'a self, calendar: &'a BusinessCalendar) -> ConflictResolver<'a> {
        ConflictResolver::new(self.date, self.service.duration_minutes(), calendar, &self.booked)
    }

    /// First free candidate after `requested`, same day only.
    pub fn next_available(&self, calendar: &BusinessCalendar, requested: NaiveTime) -> Option<NaiveTime> {
        self.resolver(calendar)
            .find_alternative(requested, self.schedule.candidates())
    }

    pub fn free_slots(&self, calendar: &BusinessCalendar) -> Vec<NaiveTime> {
        let resolver = self.resolver(calendar);
        self.schedule
            .candidates()
            .iter()
            .copied()
            .filter(|t| !resolver.has_conflict(*t))
            .collect()
    }
}

impl Scheduler {
    pub fn new(
        services: Arc<dyn ServiceCatalog>,
        hours: Arc<dyn WorkingHoursCatalog>,
        appointments: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
        calendar: BusinessCalendar,
        slots: SlotComputer,
    ) -> Self {
        Self {
            services,
            hours,
            appointments,
            clock,
            calendar,
            slots,
        }
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn appointments(&self) -> &Arc<dyn AppointmentStore> {
        &self.appointments
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Current date in the business timezone.
    pub fn today(&self) -> NaiveDate {
        self.calendar.today(self.clock.now())
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, BookingError> {
        Ok(self.services.list_services().await?)
    }

    pub async fn list_work_intervals(&self) -> Result<Vec<WorkInterval>, BookingError> {
        Ok(self.hours.list_work_intervals().await?)
    }

    pub async fn resolve_service(&self, name: &str) -> Result<Service, BookingError> {
        match self.services.find_service(name).await? {
            Some(service) => Ok(service),
            None => {
                tracing::info!(service = %name, "Unknown service requested");
                Err(BookingError::service_not_found(name))
            }
        }
    }

    /// Builds the day's candidate slots and loads its scheduled appointments.
    pub async fn day_plan(&self, service: &Service, date: NaiveDate) -> Result<DayPlan, BookingError> {
        let intervals = self.hours.list_work_intervals().await?;
        let schedule = self.slots.compute(
            date,
            service.duration_minutes(),
            &intervals,
            &self.calendar,
            self.clock.now(),
        );

        let booked = if schedule.is_closed() {
            Vec::new()
        } else {
            let (start, end) = self.calendar.day_bounds(date)?;
            self.appointments
                .find_scheduled_overlapping(
                    &Timestamp::from_datetime(start),
                    &Timestamp::from_datetime(end),
                )
                .await?
        };

        Ok(DayPlan {
            date,
            service: service.clone(),
            schedule,
            booked,
        })
    }
}
