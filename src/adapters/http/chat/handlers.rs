//! HTTP handler for inbound chat messages.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::booking::dto::AppointmentResponse;
use crate::adapters::http::error::{booking_error_response, ErrorResponse};
use crate::application::handlers::chat::{ChatInput, DialogueManager, HandleChatMessageCommand};
use crate::domain::foundation::PhoneNumber;
use crate::domain::scheduling::BusinessCalendar;

use super::dto::{ChatMessageRequest, ChatMessageResponse};

#[derive(Clone)]
pub struct ChatHandlers {
    manager: Arc<DialogueManager>,
    calendar: BusinessCalendar,
}

impl ChatHandlers {
    pub fn new(manager: Arc<DialogueManager>, calendar: BusinessCalendar) -> Self {
        Self { manager, calendar }
    }
}

/// POST /api/chat/messages - Process one inbound message and return the reply
pub async fn post_message(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<ChatMessageRequest>,
) -> Response {
    let phone = match PhoneNumber::parse(&req.phone) {
        Ok(phone) => phone,
        Err(e) => return booking_error_response(e.into()),
    };

    let input = match (req.text, req.action) {
        (Some(text), None) if !text.trim().is_empty() => ChatInput::Text(text),
        (None, Some(action)) => ChatInput::Action(action.to_string()),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(
                    "Provide exactly one of 'text' or 'action'",
                )),
            )
                .into_response()
        }
    };

    let reply = handlers
        .manager
        .handle(HandleChatMessageCommand { phone, input })
        .await;

    let response = ChatMessageResponse {
        reply: reply.reply,
        intent: reply.intent,
        state: reply.state,
        appointment: reply
            .appointment
            .as_ref()
            .map(|a| AppointmentResponse::from_appointment(a, &handlers.calendar)),
    };
    (StatusCode::OK, Json(response)).into_response()
}
