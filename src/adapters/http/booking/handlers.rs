//! HTTP handlers for booking endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{booking_error_response, status_for, ErrorResponse};
use crate::application::handlers::booking::{
    CheckConflictHandler, CheckConflictQuery, CreateBookingCommand, CreateBookingHandler,
    CreateBookingResult, ListClientAppointmentsHandler, ListClientAppointmentsQuery,
    QueryAvailabilityHandler, QueryAvailabilityQuery, UpdateAppointmentStatusCommand,
    UpdateAppointmentStatusHandler,
};
use crate::application::handlers::client::{RegisterClientCommand, RegisterClientHandler};
use crate::domain::foundation::{AppointmentId, AppointmentStatus, PhoneNumber};
use crate::domain::scheduling::{
    parse_booking_date, parse_booking_time, BookingError, BusinessCalendar, NotFoundKind,
};

use super::dto::{
    AppointmentResponse, AvailabilityParams, AvailabilityResponse, BookingResponse,
    ClientAppointmentsResponse, ConflictParams, ConflictResponse, CreateBookingRequest,
    UpdateStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BookingHandlers {
    create_handler: Arc<CreateBookingHandler>,
    register_handler: Arc<RegisterClientHandler>,
    availability_handler: Arc<QueryAvailabilityHandler>,
    conflict_handler: Arc<CheckConflictHandler>,
    list_handler: Arc<ListClientAppointmentsHandler>,
    status_handler: Arc<UpdateAppointmentStatusHandler>,
    calendar: BusinessCalendar,
}

impl BookingHandlers {
    pub fn new(
        create_handler: Arc<CreateBookingHandler>,
        register_handler: Arc<RegisterClientHandler>,
        availability_handler: Arc<QueryAvailabilityHandler>,
        conflict_handler: Arc<CheckConflictHandler>,
        list_handler: Arc<ListClientAppointmentsHandler>,
        status_handler: Arc<UpdateAppointmentStatusHandler>,
        calendar: BusinessCalendar,
    ) -> Self {
        Self {
            create_handler,
            register_handler,
            availability_handler,
            conflict_handler,
            list_handler,
            status_handler,
            calendar,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings - Book a slot, registering the client when a name is given
pub async fn create_booking(
    State(handlers): State<BookingHandlers>,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let cmd = match parse_booking_request(&req) {
        Ok(cmd) => cmd,
        Err(e) => return booking_failure(e),
    };

    let result = match handlers.create_handler.handle(cmd.clone()).await {
        Err(BookingError::NotFound(NotFoundKind::Client(phone))) => match req.name {
            Some(name) => {
                if let Err(e) = handlers
                    .register_handler
                    .handle(RegisterClientCommand { name, phone })
                    .await
                {
                    return booking_failure(e);
                }
                handlers.create_handler.handle(cmd).await
            }
            None => Err(BookingError::NotFound(NotFoundKind::Client(phone))),
        },
        other => other,
    };

    match result {
        Ok(CreateBookingResult {
            appointment,
            confirmation_message,
            ..
        }) => {
            let response = BookingResponse {
                success: true,
                appointment: Some(AppointmentResponse::from_appointment(
                    &appointment,
                    &handlers.calendar,
                )),
                error: None,
                confirmation_message: Some(confirmation_message),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => booking_failure(e),
    }
}

/// GET /api/availability?date=&service= - Candidate slots annotated with availability
pub async fn query_availability(
    State(handlers): State<BookingHandlers>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    let date = match parse_booking_date(&params.date) {
        Ok(date) => date,
        Err(e) => return booking_error_response(e.into()),
    };
    let query = QueryAvailabilityQuery {
        date,
        service: params.service,
    };

    match handlers.availability_handler.handle(query).await {
        Ok(view) => (StatusCode::OK, Json(AvailabilityResponse::from(view))).into_response(),
        Err(e) => booking_error_response(e),
    }
}

/// GET /api/conflicts?date=&time=&service= - Is this start free?
pub async fn check_conflict(
    State(handlers): State<BookingHandlers>,
    Query(params): Query<ConflictParams>,
) -> Response {
    let parsed = parse_booking_date(&params.date)
        .and_then(|date| parse_booking_time(&params.time).map(|time| (date, time)));
    let (date, time) = match parsed {
        Ok(pair) => pair,
        Err(e) => return booking_error_response(e.into()),
    };
    let query = CheckConflictQuery {
        date,
        time,
        service: params.service,
    };

    match handlers.conflict_handler.handle(query).await {
        Ok(check) => (StatusCode::OK, Json(ConflictResponse::from(check))).into_response(),
        Err(e) => booking_error_response(e),
    }
}

/// GET /api/clients/:phone/appointments - Upcoming bookings of a client
pub async fn list_client_appointments(
    State(handlers): State<BookingHandlers>,
    Path(phone): Path<String>,
) -> Response {
    let phone = match PhoneNumber::parse(&phone) {
        Ok(phone) => phone,
        Err(e) => return booking_error_response(e.into()),
    };

    match handlers
        .list_handler
        .handle(ListClientAppointmentsQuery { phone })
        .await
    {
        Ok(found) => {
            let response = ClientAppointmentsResponse {
                client_id: found.client.id.to_string(),
                name: found.client.name,
                appointments: found
                    .appointments
                    .iter()
                    .map(|a| AppointmentResponse::from_appointment(a, &handlers.calendar))
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => booking_error_response(e),
    }
}

/// PATCH /api/appointments/:id/status - Complete or cancel an appointment
pub async fn update_appointment_status(
    State(handlers): State<BookingHandlers>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Response {
    let appointment_id = match id.parse::<AppointmentId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid appointment ID")),
            )
                .into_response()
        }
    };
    let status = match req.status.parse::<AppointmentStatus>() {
        Ok(status) => status,
        Err(e) => return booking_error_response(e.into()),
    };

    let cmd = UpdateAppointmentStatusCommand {
        appointment_id,
        status,
    };
    match handlers.status_handler.handle(cmd).await {
        Ok(appointment) => (
            StatusCode::OK,
            Json(AppointmentResponse::from_appointment(&appointment, &handlers.calendar)),
        )
            .into_response(),
        Err(e) => booking_error_response(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_booking_request(req: &CreateBookingRequest) -> Result<CreateBookingCommand, BookingError> {
    Ok(CreateBookingCommand {
        phone: PhoneNumber::parse(&req.phone)?,
        service: req.service.clone(),
        date: parse_booking_date(&req.date)?,
        time: parse_booking_time(&req.time)?,
    })
}

fn booking_failure(err: BookingError) -> Response {
    let response = BookingResponse {
        success: false,
        appointment: None,
        error: Some(ErrorResponse::from(&err)),
        confirmation_message: None,
    };
    (status_for(&err), Json(response)).into_response()
}
