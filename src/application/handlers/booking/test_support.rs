//! Shared fixtures for booking handler tests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use std::sync::Arc;

use super::Scheduler;
use crate::adapters::memory::{InMemoryAppointmentStore, InMemoryCatalog, InMemoryClientDirectory};
use crate::adapters::ManualClock;
use crate::domain::client::Client;
use crate::domain::foundation::{AccountId, PhoneNumber, Timestamp};
use crate::domain::scheduling::{BusinessCalendar, Service, SlotComputer, WorkInterval};
use crate::ports::ClientDirectory;

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Wednesday 2024-01-10.
pub fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

pub fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
}

pub fn phone() -> PhoneNumber {
    PhoneNumber::parse("11987654321").unwrap()
}

pub fn account() -> AccountId {
    AccountId::new("barbearia-centro").unwrap()
}

pub struct Fixture {
    pub clock: ManualClock,
    pub catalog: InMemoryCatalog,
    pub clients: Arc<InMemoryClientDirectory>,
    pub appointments: Arc<InMemoryAppointmentStore>,
    pub scheduler: Scheduler,
}

impl Fixture {
    /// Mon-Sat 09:00-12:00 and 14:00-18:00, closed on Sunday.
    /// The clock reads 2024-01-10 08:00 in São Paulo.
    pub fn new() -> Self {
        let clock = ManualClock::at(
            DateTime::parse_from_rfc3339("2024-01-10T11:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );

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
        let catalog = InMemoryCatalog::new(
            vec![
                Service::new("Corte", 3500, 30).unwrap(),
                Service::new("Barba", 2500, 20).unwrap(),
                Service::new("Corte e Barba", 5500, 50).unwrap(),
            ],
            intervals,
        );

        let clients = Arc::new(InMemoryClientDirectory::new());
        let appointments = Arc::new(InMemoryAppointmentStore::new());
        let scheduler = Scheduler::new(
            Arc::new(catalog.clone()),
            Arc::new(catalog.clone()),
            appointments.clone(),
            Arc::new(clock.clone()),
            BusinessCalendar::from_name("America/Sao_Paulo").unwrap(),
            SlotComputer::default(),
        );

        Self {
            clock,
            catalog,
            clients,
            appointments,
            scheduler,
        }
    }

    pub async fn register(&self, name: &str) -> Client {
        let client = Client::register(name, phone(), account(), Timestamp::now()).unwrap();
        self.clients.create(client).await.unwrap()
    }
}
