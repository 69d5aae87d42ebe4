//! Booking dialogue state machine.
//!
//! Defines the dialogue states and valid transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a booking conversation currently stands.
///
/// Conversations collect fields in priority order, verify the slot, then ask
/// for explicit confirmation:
/// - `CollectService` / `CollectDate` / `CollectTime` / `CollectName`: a
///   targeted question for exactly that field is outstanding
/// - `VerifySlot`: every field is known, the slot is being checked
/// - `Confirm`: the slot was free, waiting for yes/no
/// - `Done`: booking committed, context discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    CollectService,
    CollectDate,
    CollectTime,
    CollectName,
    VerifySlot,
    Confirm,
    Done,
}

impl DialogueState {
    /// True for the four field-collection states.
    pub fn is_collecting(&self) -> bool {
        matches!(
            self,
            Self::CollectService | Self::CollectDate | Self::CollectTime | Self::CollectName
        )
    }

    pub fn awaits_confirmation(&self) -> bool {
        matches!(self, Self::Confirm)
    }
}

impl StateMachine for DialogueState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogueState::*;
        match (self, target) {
            // Any collection state may ask for any missing field or verify
            (from, to) if from.is_collecting() => to.is_collecting() || *to == VerifySlot,
            // Free slot asks for confirmation; anything else re-collects
            (VerifySlot, to) => *to == Confirm || to.is_collecting(),
            // Commit, re-verify after a lost race or new details, or pick another time
            (Confirm, Done) | (Confirm, VerifySlot) | (Confirm, CollectTime) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueState::*;
        match self {
            CollectService | CollectDate | CollectTime | CollectName => vec![
                CollectService,
                CollectDate,
                CollectTime,
                CollectName,
                VerifySlot,
            ],
            VerifySlot => vec![
                Confirm,
                CollectService,
                CollectDate,
                CollectTime,
                CollectName,
            ],
            Confirm => vec![Done, VerifySlot, CollectTime],
            Done => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DialogueState; 7] = [
        DialogueState::CollectService,
        DialogueState::CollectDate,
        DialogueState::CollectTime,
        DialogueState::CollectName,
        DialogueState::VerifySlot,
        DialogueState::Confirm,
        DialogueState::Done,
    ];

    #[test]
    fn default_collects_service() {
        assert_eq!(DialogueState::default(), DialogueState::CollectService);
    }

    #[test]
    fn confirmation_requires_verification_first() {
        assert!(!DialogueState::CollectTime.can_transition_to(&DialogueState::Confirm));
        assert!(DialogueState::VerifySlot.can_transition_to(&DialogueState::Confirm));
    }

    #[test]
    fn done_only_after_confirm() {
        for state in ALL {
            let allowed = state.can_transition_to(&DialogueState::Done);
            assert_eq!(allowed, state == DialogueState::Confirm, "{:?}", state);
        }
    }

    #[test]
    fn done_is_terminal() {
        assert!(DialogueState::Done.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&DialogueState::VerifySlot).unwrap(),
            "\"verify_slot\""
        );
    }
}
