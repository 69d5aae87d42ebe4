//! Shared wiring for integration tests: the full application over
//! in-memory adapters and a manual clock.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use barber_booking::adapters::http::{build_router, BookingHandlers, ChatHandlers, RouterSettings};
use barber_booking::adapters::{
    InMemoryAppointmentStore, InMemoryCatalog, InMemoryClientDirectory, InMemoryConversationStore,
    ManualClock,
};
use barber_booking::application::{
    CheckConflictHandler, ConversationLocks, CreateBookingHandler, DialogueManager,
    ListClientAppointmentsHandler, QueryAvailabilityHandler, RegisterClientHandler, Scheduler,
    UpdateAppointmentStatusHandler,
};
use barber_booking::domain::foundation::{AccountId, PhoneNumber};
use barber_booking::domain::scheduling::{BusinessCalendar, Service, SlotComputer, WorkInterval};

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Wednesday 2024-01-10, the "today" of every test app.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

pub fn phone(n: u32) -> PhoneNumber {
    PhoneNumber::parse(&format!("1198765{:04}", n)).unwrap()
}

pub struct TestApp {
    pub clock: ManualClock,
    pub clients: Arc<InMemoryClientDirectory>,
    pub appointments: Arc<InMemoryAppointmentStore>,
    pub conversations: Arc<InMemoryConversationStore>,
    pub scheduler: Scheduler,
    pub create: Arc<CreateBookingHandler>,
    pub register: Arc<RegisterClientHandler>,
    pub dialogue: Arc<DialogueManager>,
}

impl TestApp {
    /// Mon-Sat 09:00-12:00 and 14:00-18:00 in São Paulo; the clock reads
    /// 2024-01-10 08:00 local time.
    pub fn new() -> Self {
        let clock = ManualClock::at(
            DateTime::parse_from_rfc3339("2024-01-10T11:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        let calendar = BusinessCalendar::from_name("America/Sao_Paulo").unwrap();
        let account = AccountId::new("barbearia-centro").unwrap();

        let mut intervals = Vec::new();
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ] {
            intervals.push(WorkInterval::new(weekday, hm(9, 0), hm(12, 0), true).unwrap());
            intervals.push(WorkInterval::new(weekday, hm(14, 0), hm(18, 0), true).unwrap());
        }
        let catalog = Arc::new(InMemoryCatalog::new(
            vec![
                Service::new("Corte", 3500, 30).unwrap(),
                Service::new("Barba", 2500, 20).unwrap(),
                Service::new("Corte e Barba", 5500, 50).unwrap(),
            ],
            intervals,
        ));

        let clients = Arc::new(InMemoryClientDirectory::new());
        let appointments = Arc::new(InMemoryAppointmentStore::new());
        let conversations = Arc::new(InMemoryConversationStore::new(
            Arc::new(clock.clone()),
            Duration::minutes(30),
            Duration::hours(24),
        ));

        let scheduler = Scheduler::new(
            catalog.clone(),
            catalog,
            appointments.clone(),
            Arc::new(clock.clone()),
            calendar,
            SlotComputer::default(),
        );

        let create = Arc::new(CreateBookingHandler::new(scheduler.clone(), clients.clone()));
        let register = Arc::new(RegisterClientHandler::new(
            clients.clone(),
            Arc::new(clock.clone()),
            account.clone(),
        ));
        let dialogue = Arc::new(DialogueManager::new(
            scheduler.clone(),
            conversations.clone(),
            clients.clone(),
            account,
            ConversationLocks::new(),
        ));

        Self {
            clock,
            clients,
            appointments,
            conversations,
            scheduler,
            create,
            register,
            dialogue,
        }
    }

    pub fn router(&self) -> Router {
        let calendar = *self.scheduler.calendar();
        let booking = BookingHandlers::new(
            self.create.clone(),
            self.register.clone(),
            Arc::new(QueryAvailabilityHandler::new(self.scheduler.clone())),
            Arc::new(CheckConflictHandler::new(self.scheduler.clone())),
            Arc::new(ListClientAppointmentsHandler::new(
                self.scheduler.clone(),
                self.clients.clone(),
            )),
            Arc::new(UpdateAppointmentStatusHandler::new(self.appointments.clone())),
            calendar,
        );
        let chat = ChatHandlers::new(self.dialogue.clone(), calendar);
        build_router(booking, chat, &RouterSettings::default())
    }
}
