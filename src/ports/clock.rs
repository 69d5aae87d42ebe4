//! Time source port.

use crate::domain::foundation::Timestamp;

/// Source of "now" for every time-sensitive decision.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
