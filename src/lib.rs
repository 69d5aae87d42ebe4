//! Barber Booking - appointment scheduling for a barbershop
//!
//! Customers book through a chat dialogue or the HTTP API. Availability is
//! computed from weekly working hours on a fixed slot grid, and every
//! booking goes through an atomic reserve-or-fail step so a time window is
//! never sold twice.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
