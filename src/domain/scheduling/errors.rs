//! Booking error taxonomy.

use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fmt;
use thiserror::Error;

use super::calendar::weekday_label;
use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode, PhoneNumber, ValidationError};

/// Which lookup came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundKind {
    Service(String),
    Client(PhoneNumber),
    Appointment(AppointmentId),
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundKind::Service(name) => write!(f, "Service '{}'", name),
            NotFoundKind::Client(phone) => write!(f, "Client with phone {}", phone),
            NotFoundKind::Appointment(id) => write!(f, "Appointment {}", id),
        }
    }
}

/// Errors raised by availability, conflict and booking operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Malformed or out-of-policy input.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Unknown service, client or appointment.
    #[error("{0} not found")]
    NotFound(NotFoundKind),

    /// The slot is taken. Carries the next free start of the same day, if any.
    #[error("Slot {} is unavailable", .requested.format("%H:%M"))]
    Conflict {
        requested: NaiveTime,
        next_available: Option<NaiveTime>,
    },

    /// No active work interval on the requested weekday.
    #[error("No working hours on {weekday} ({date})")]
    Closed { date: NaiveDate, weekday: Weekday },

    /// Downstream lookup failed; the detail is for logs only.
    #[error("Temporary failure: {0}")]
    Transient(String),
}

impl BookingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn service_not_found(name: impl Into<String>) -> Self {
        BookingError::NotFound(NotFoundKind::Service(name.into()))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::Validation { .. } => ErrorCode::ValidationFailed,
            BookingError::NotFound(NotFoundKind::Service(_)) => ErrorCode::ServiceNotFound,
            BookingError::NotFound(NotFoundKind::Client(_)) => ErrorCode::ClientNotFound,
            BookingError::NotFound(NotFoundKind::Appointment(_)) => ErrorCode::AppointmentNotFound,
            BookingError::Conflict { .. } => ErrorCode::SlotUnavailable,
            BookingError::Closed { .. } => ErrorCode::ClosedDay,
            BookingError::Transient(_) => ErrorCode::InternalError,
        }
    }

    /// Customer-facing text. Never includes infrastructure detail.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Validation { field, message } => match field.as_str() {
                "date" => "Não entendi a data. Pode enviar no formato DD/MM?".to_string(),
                "time" => "Não entendi o horário. Pode enviar no formato HH:MM?".to_string(),
                "phone" => "O número de telefone informado é inválido.".to_string(),
                _ => format!("Dados inválidos: {}", message),
            },
            BookingError::NotFound(NotFoundKind::Service(_)) => {
                "Não encontrei esse serviço. Quer ver a lista de serviços?".to_string()
            }
            BookingError::NotFound(NotFoundKind::Client(_)) => {
                "Não encontrei seu cadastro. Qual é o seu nome completo?".to_string()
            }
            BookingError::NotFound(NotFoundKind::Appointment(_)) => {
                "Não encontrei esse agendamento.".to_string()
            }
            BookingError::Conflict {
                requested,
                next_available: Some(next),
            } => format!(
                "O horário das {} já está ocupado. O próximo horário livre é às {}.",
                requested.format("%H:%M"),
                next.format("%H:%M")
            ),
            BookingError::Conflict {
                requested,
                next_available: None,
            } => format!(
                "O horário das {} já está ocupado e não há outros horários livres nesse dia.",
                requested.format("%H:%M")
            ),
            BookingError::Closed { weekday, .. } => {
                format!("Não atendemos nesse dia ({}). Pode escolher outro dia?", weekday_label(*weekday))
            }
            BookingError::Transient(_) => {
                "Tivemos um problema temporário. Pode tentar novamente em instantes?".to_string()
            }
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => BookingError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => {
                tracing::error!(code = %err.code, "Downstream failure: {}", err.message);
                BookingError::Transient(err.to_string())
            }
        }
    }
}
