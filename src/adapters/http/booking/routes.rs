//! HTTP routes for booking endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    check_conflict, create_booking, list_client_appointments, query_availability,
    update_appointment_status, BookingHandlers,
};

/// Creates the booking router with all endpoints.
pub fn booking_routes(handlers: BookingHandlers) -> Router {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/availability", get(query_availability))
        .route("/conflicts", get(check_conflict))
        .route("/clients/:phone/appointments", get(list_client_appointments))
        .route("/appointments/:id/status", patch(update_appointment_status))
        .with_state(handlers)
}
