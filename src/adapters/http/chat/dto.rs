//! HTTP DTOs for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::adapters::http::booking::dto::AppointmentResponse;
use crate::domain::conversation::{DialogueState, Intent};

/// An inbound message: free `text` or a structured `action`, not both.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRequest {
    pub phone: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub action: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub reply: String,
    pub intent: Option<Intent>,
    pub state: Option<DialogueState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentResponse>,
}
