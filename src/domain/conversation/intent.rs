//! Closed set of chat intents and schema-checked agent actions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::text::{contains_phrase, fold, tokens};
use super::BookingFields;
use crate::domain::scheduling::{parse_booking_date, parse_booking_time};

/// What the customer wants from this message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Book,
    ListServices,
    ListWorkingHours,
    ListMyBookings,
    Cancel,
    Reschedule,
}

const CANCEL_PHRASES: &[&str] = &["cancelar", "cancela", "desmarcar", "desmarca", "cancel"];

const RESCHEDULE_PHRASES: &[&str] = &[
    "remarcar",
    "remarca",
    "reagendar",
    "mudar meu horario",
    "trocar meu horario",
    "mudar o horario",
    "reschedule",
];

const MY_BOOKINGS_PHRASES: &[&str] = &[
    "meus agendamentos",
    "meu agendamento",
    "meus horarios",
    "minhas reservas",
    "tenho horario",
    "tenho agendamento",
    "my bookings",
    "my appointments",
];

const WORKING_HOURS_PHRASES: &[&str] = &[
    "horario de funcionamento",
    "horarios de funcionamento",
    "funcionamento",
    "que horas abre",
    "que horas fecha",
    "quando abre",
    "voces abrem",
    "opening hours",
    "working hours",
];

const SERVICES_PHRASES: &[&str] = &[
    "quais servicos",
    "quais os servicos",
    "lista de servicos",
    "tabela de precos",
    "precos",
    "quanto custa",
    "cardapio",
    "services",
    "prices",
];

impl Intent {
    /// Keyword classifier. Anything not recognised is a booking attempt.
    pub fn classify(text: &str) -> Intent {
        let folded = fold(text);
        let toks = tokens(&folded);
        let any = |phrases: &[&str]| phrases.iter().any(|p| contains_phrase(&toks, p));

        if any(RESCHEDULE_PHRASES) {
            Intent::Reschedule
        } else if any(CANCEL_PHRASES) {
            Intent::Cancel
        } else if any(MY_BOOKINGS_PHRASES) {
            Intent::ListMyBookings
        } else if any(WORKING_HOURS_PHRASES) {
            Intent::ListWorkingHours
        } else if any(SERVICES_PHRASES) {
            Intent::ListServices
        } else {
            Intent::Book
        }
    }

    /// Answered directly without touching the conversation context.
    pub fn is_one_shot(&self) -> bool {
        matches!(
            self,
            Intent::ListServices | Intent::ListWorkingHours | Intent::ListMyBookings
        )
    }

    /// Never executed automatically; escalated to a human operator.
    pub fn requires_handoff(&self) -> bool {
        matches!(self, Intent::Cancel | Intent::Reschedule)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Book => "book",
            Intent::ListServices => "list_services",
            Intent::ListWorkingHours => "list_working_hours",
            Intent::ListMyBookings => "list_my_bookings",
            Intent::Cancel => "cancel",
            Intent::Reschedule => "reschedule",
        }
    }

    fn from_action(name: &str) -> Option<Intent> {
        match name {
            "book" => Some(Intent::Book),
            "list_services" => Some(Intent::ListServices),
            "list_working_hours" => Some(Intent::ListWorkingHours),
            "list_my_bookings" => Some(Intent::ListMyBookings),
            "cancel" => Some(Intent::Cancel),
            "reschedule" => Some(Intent::Reschedule),
            _ => None,
        }
    }

    fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Intent::Book => &["action", "service", "date", "time", "name"],
            _ => &["action"],
        }
    }
}

/// Why an agent action was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("Malformed action payload: {0}")]
    Malformed(String),

    #[error("Action payload must be a JSON object")]
    NotAnObject,

    #[error("Missing 'action' tag")]
    MissingAction,

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Field '{field}' is not allowed for action '{action}'")]
    UnexpectedField { action: String, field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

/// A structured action, already checked against the action schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub intent: Intent,
    pub fields: BookingFields,
}

impl AgentAction {
    /// Parses `{"action": "...", ...}`. Anything outside the closed schema
    /// is refused and logged; nothing is dispatched.
    pub fn parse(payload: &str) -> Result<AgentAction, IntentError> {
        let result = Self::parse_inner(payload);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Rejected agent action");
        }
        result
    }

    fn parse_inner(payload: &str) -> Result<AgentAction, IntentError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| IntentError::Malformed(e.to_string()))?;
        let object = value.as_object().ok_or(IntentError::NotAnObject)?;

        let action = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or(IntentError::MissingAction)?;
        let intent =
            Intent::from_action(action).ok_or_else(|| IntentError::UnknownAction(action.into()))?;

        let allowed = intent.allowed_fields();
        if let Some(field) = object.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(IntentError::UnexpectedField {
                action: action.to_string(),
                field: field.clone(),
            });
        }

        let fields = match intent {
            Intent::Book => booking_fields(object)?,
            _ => BookingFields::default(),
        };

        Ok(AgentAction { intent, fields })
    }
}

fn optional_string<'a>(object: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>, IntentError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(_) => Err(IntentError::InvalidField {
            field: field.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

fn booking_fields(object: &Map<String, Value>) -> Result<BookingFields, IntentError> {
    let invalid = |field: &str, err: crate::domain::foundation::ValidationError| {
        IntentError::InvalidField {
            field: field.to_string(),
            reason: err.to_string(),
        }
    };

    let date = optional_string(object, "date")?
        .map(|raw| parse_booking_date(raw).map_err(|e| invalid("date", e)))
        .transpose()?;
    let time = optional_string(object, "time")?
        .map(|raw| parse_booking_time(raw).map_err(|e| invalid("time", e)))
        .transpose()?;

    Ok(BookingFields {
        service: optional_string(object, "service")?.map(str::to_string),
        date,
        time,
        name: optional_string(object, "name")?.map(str::to_string),
    })
}
