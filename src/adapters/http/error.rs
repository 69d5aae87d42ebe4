//! Uniform error body and status mapping for booking failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::scheduling::{weekday_label, BookingError};

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&BookingError> for ErrorResponse {
    fn from(err: &BookingError) -> Self {
        let details = match err {
            BookingError::Validation { field, .. } => Some(json!({ "field": field })),
            BookingError::Conflict {
                requested,
                next_available,
            } => Some(json!({
                "requested": requested.format("%H:%M").to_string(),
                "next_available": next_available.map(|t| t.format("%H:%M").to_string()),
            })),
            BookingError::Closed { date, weekday } => Some(json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "weekday": weekday_label(*weekday),
            })),
            BookingError::NotFound(_) | BookingError::Transient(_) => None,
        };

        // Transient detail is for the logs only
        let message = match err {
            BookingError::Transient(_) => err.user_message(),
            other => other.to_string(),
        };

        Self {
            code: err.code().to_string(),
            message,
            details,
        }
    }
}

/// HTTP status for each failure kind.
pub fn status_for(err: &BookingError) -> StatusCode {
    match err {
        BookingError::Validation { .. } => StatusCode::BAD_REQUEST,
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::Conflict { .. } => StatusCode::CONFLICT,
        BookingError::Closed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn booking_error_response(err: BookingError) -> Response {
    (status_for(&err), Json(ErrorResponse::from(&err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    #[test]
    fn conflict_maps_to_409_with_alternative() {
        let err = BookingError::Conflict {
            requested: NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            next_available: NaiveTime::from_hms_opt(10, 30, 0),
        };
        assert_eq!(status_for(&err), StatusCode::CONFLICT);

        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "SLOT_UNAVAILABLE");
        assert_eq!(body.details.unwrap()["next_available"], "10:30");
    }

    #[test]
    fn closed_maps_to_422() {
        let err = BookingError::Closed {
            date: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            weekday: Weekday::Sun,
        };
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorResponse::from(&err).details.unwrap()["weekday"], "domingo");
    }

    #[test]
    fn transient_hides_detail() {
        let err = BookingError::Transient("pool timed out on db-primary:5432".into());
        assert_eq!(status_for(&err), StatusCode::SERVICE_UNAVAILABLE);
        let body = ErrorResponse::from(&err);
        assert!(!body.message.contains("db-primary"));
        assert!(body.details.is_none());
    }

    #[test]
    fn validation_carries_field() {
        let err = BookingError::validation("time", "expected HH:MM");
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorResponse::from(&err).details.unwrap()["field"], "time");
    }
}
