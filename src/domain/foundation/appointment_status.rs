//! AppointmentStatus enum for tracking the lifecycle of a booking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Lifecycle status of an appointment.
///
/// Only `Scheduled` appointments occupy the calendar. `Completed` and
/// `Cancelled` are terminal: an appointment never returns to `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Returns true if the appointment blocks its time window.
    pub fn occupies_calendar(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for AppointmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AppointmentStatus::*;
        matches!((self, target), (Scheduled, Completed) | (Scheduled, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AppointmentStatus::*;
        match self {
            Scheduled => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown appointment status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_scheduled() {
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Scheduled);
    }

    #[test]
    fn only_scheduled_occupies_calendar() {
        assert!(AppointmentStatus::Scheduled.occupies_calendar());
        assert!(!AppointmentStatus::Completed.occupies_calendar());
        assert!(!AppointmentStatus::Cancelled.occupies_calendar());
    }

    #[test]
    fn scheduled_moves_to_terminal_states() {
        assert!(AppointmentStatus::Scheduled.can_transition_to(&AppointmentStatus::Completed));
        assert!(AppointmentStatus::Scheduled.can_transition_to(&AppointmentStatus::Cancelled));
    }

    #[test]
    fn terminal_states_cannot_be_reactivated() {
        assert!(AppointmentStatus::Completed
            .transition_to(AppointmentStatus::Scheduled)
            .is_err());
        assert!(AppointmentStatus::Cancelled
            .transition_to(AppointmentStatus::Scheduled)
            .is_err());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn parses_storage_representation() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
