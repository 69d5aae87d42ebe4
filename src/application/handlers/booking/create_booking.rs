//! CreateBookingHandler - commits a booking with reserve-or-fail semantics.

use chrono::{Months, NaiveDate, NaiveTime};
use std::sync::Arc;

use super::Scheduler;
use crate::domain::client::Client;
use crate::domain::conversation::replies;
use crate::domain::foundation::{PhoneNumber, Timestamp};
use crate::domain::scheduling::{Appointment, BookingError, DaySchedule, NotFoundKind};
use crate::ports::{ClientDirectory, ReserveOutcome};

/// Default number of months ahead a booking may be made.
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// Command to book a service for an existing client.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub phone: PhoneNumber,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct CreateBookingResult {
    pub appointment: Appointment,
    pub client: Client,
    pub confirmation_message: String,
}

/// Books an appointment.
///
/// The client must already exist; an unknown phone yields
/// `NotFound(Client)` and the caller decides whether to register it.
pub struct CreateBookingHandler {
    scheduler: Scheduler,
    clients: Arc<dyn ClientDirectory>,
    horizon_months: u32,
}

impl CreateBookingHandler {
    pub fn new(scheduler: Scheduler, clients: Arc<dyn ClientDirectory>) -> Self {
        Self {
            scheduler,
            clients,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    pub fn with_horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<CreateBookingResult, BookingError> {
        let calendar = *self.scheduler.calendar();
        let now = self.scheduler.now();

        // 1. Date policy
        let today = calendar.today(now);
        if cmd.date < today {
            return Err(BookingError::validation("date", "date is in the past"));
        }
        let horizon = today
            .checked_add_months(Months::new(self.horizon_months))
            .unwrap_or(today);
        if cmd.date > horizon {
            return Err(BookingError::validation(
                "date",
                format!("bookings open at most {} months ahead", self.horizon_months),
            ));
        }

        // 2. Service and client
        let service = self.scheduler.resolve_service(&cmd.service).await?;
        let client = self
            .clients
            .find_by_phone(&cmd.phone)
            .await?
            .ok_or_else(|| BookingError::NotFound(NotFoundKind::Client(cmd.phone.clone())))?;

        // 3. Working hours
        let plan = self.scheduler.day_plan(&service, cmd.date).await?;
        if let DaySchedule::Closed { weekday } = plan.schedule {
            return Err(BookingError::Closed {
                date: cmd.date,
                weekday,
            });
        }
        if !plan.schedule.offers(cmd.time) {
            let start = calendar.to_utc(cmd.date, cmd.time)?;
            let reason = if start <= *now.as_datetime() {
                "time must be in the future"
            } else {
                "time is not a bookable start within working hours"
            };
            return Err(BookingError::validation("time", reason));
        }

        // 4. Atomic reserve; the store re-checks overlap under its lock
        let start = Timestamp::from_datetime(calendar.to_utc(cmd.date, cmd.time)?);
        let appointment = Appointment::schedule(client.id, &service, start, now);

        match self
            .scheduler
            .appointments()
            .reserve(&appointment, cmd.date)
            .await?
        {
            ReserveOutcome::Reserved => {
                tracing::info!(
                    appointment_id = %appointment.id,
                    phone = %cmd.phone,
                    date = %cmd.date,
                    time = %cmd.time.format("%H:%M"),
                    service = %service.name(),
                    "Appointment booked"
                );
                let confirmation_message =
                    replies::booked(&appointment, &calendar, client.first_name());
                Ok(CreateBookingResult {
                    appointment,
                    client,
                    confirmation_message,
                })
            }
            ReserveOutcome::Conflict => {
                // Bookings changed since the plan was built; recompute the alternative
                let fresh = self.scheduler.day_plan(&service, cmd.date).await?;
                let next_available = fresh.next_available(&calendar, cmd.time);
                tracing::warn!(
                    phone = %cmd.phone,
                    date = %cmd.date,
                    time = %cmd.time.format("%H:%M"),
                    next_available = ?next_available,
                    "Slot taken at commit time"
                );
                Err(BookingError::Conflict {
                    requested: cmd.time,
                    next_available,
                })
            }
        }
    }
}
