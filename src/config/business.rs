//! Business rules configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::AccountId;
use crate::domain::scheduling::{BusinessCalendar, SlotComputer, DEFAULT_GRANULARITY_MINUTES};

/// Shop-level settings: timezone, slot grid, conversation lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Account that owns clients created by this deployment
    pub account_id: String,

    /// IANA timezone all dates and times are interpreted in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Spacing of candidate slot starts
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,

    /// Idle time after which a chat context is discarded
    #[serde(default = "default_conversation_ttl")]
    pub conversation_ttl_minutes: u64,

    /// Window in which a phone is greeted only once
    #[serde(default = "default_greeting_ttl")]
    pub greeting_ttl_hours: u64,

    /// How far ahead bookings are accepted
    #[serde(default = "default_horizon")]
    pub booking_horizon_months: u32,

    /// Free slots listed when asking for a time
    #[serde(default = "default_slot_hints")]
    pub slot_hints: usize,

    /// Period of the idle-conversation sweep
    #[serde(default = "default_expiry_sweep")]
    pub expiry_sweep_secs: u64,
}

impl BusinessConfig {
    pub fn calendar(&self) -> Result<BusinessCalendar, ValidationError> {
        BusinessCalendar::from_name(&self.timezone)
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn account(&self) -> Result<AccountId, ValidationError> {
        AccountId::new(self.account_id.clone())
            .map_err(|_| ValidationError::MissingRequired("BUSINESS_ACCOUNT_ID"))
    }

    pub fn slot_computer(&self) -> SlotComputer {
        SlotComputer::new(self.slot_granularity_minutes)
    }

    pub fn conversation_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.conversation_ttl_minutes as i64)
    }

    pub fn greeting_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.greeting_ttl_hours as i64)
    }

    pub fn expiry_sweep(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_secs)
    }

    /// Validate business configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.account()?;
        self.calendar()?;
        let g = self.slot_granularity_minutes;
        if g == 0 || 60 % g != 0 {
            return Err(ValidationError::InvalidGranularity(g));
        }
        if self.conversation_ttl_minutes == 0 {
            return Err(ValidationError::ZeroDuration("conversation_ttl_minutes"));
        }
        if self.greeting_ttl_hours == 0 {
            return Err(ValidationError::ZeroDuration("greeting_ttl_hours"));
        }
        if self.slot_hints == 0 {
            return Err(ValidationError::ZeroDuration("slot_hints"));
        }
        if self.expiry_sweep_secs == 0 {
            return Err(ValidationError::ZeroDuration("expiry_sweep_secs"));
        }
        if !(1..=24).contains(&self.booking_horizon_months) {
            return Err(ValidationError::InvalidHorizon(self.booking_horizon_months));
        }
        Ok(())
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            timezone: default_timezone(),
            slot_granularity_minutes: default_granularity(),
            conversation_ttl_minutes: default_conversation_ttl(),
            greeting_ttl_hours: default_greeting_ttl(),
            booking_horizon_months: default_horizon(),
            slot_hints: default_slot_hints(),
            expiry_sweep_secs: default_expiry_sweep(),
        }
    }
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_granularity() -> u32 {
    DEFAULT_GRANULARITY_MINUTES
}

fn default_conversation_ttl() -> u64 {
    30
}

fn default_greeting_ttl() -> u64 {
    24
}

fn default_horizon() -> u32 {
    3
}

fn default_slot_hints() -> usize {
    6
}

fn default_expiry_sweep() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> BusinessConfig {
        BusinessConfig {
            account_id: "barbearia-centro".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_business_defaults() {
        let config = BusinessConfig::default();
        assert_eq!(config.timezone, "America/Sao_Paulo");
        assert_eq!(config.slot_granularity_minutes, 15);
        assert_eq!(config.conversation_ttl_minutes, 30);
        assert_eq!(config.greeting_ttl_hours, 24);
        assert_eq!(config.booking_horizon_months, 3);
    }

    #[test]
    fn test_valid_config() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert_eq!(config.account().unwrap().as_str(), "barbearia-centro");
        assert_eq!(config.conversation_ttl(), chrono::Duration::minutes(30));
        assert_eq!(config.greeting_ttl(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_missing_account() {
        let config = BusinessConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BUSINESS_ACCOUNT_ID"))
        );
    }

    #[test]
    fn test_unknown_timezone() {
        let config = BusinessConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimezone(_))));
    }

    #[test]
    fn test_granularity_must_divide_an_hour() {
        for bad in [0, 7, 45] {
            let config = BusinessConfig {
                slot_granularity_minutes: bad,
                ..valid()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidGranularity(bad)));
        }
        for good in [5, 10, 15, 20, 30, 60] {
            let config = BusinessConfig {
                slot_granularity_minutes: good,
                ..valid()
            };
            assert!(config.validate().is_ok(), "granularity {good}");
        }
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = BusinessConfig {
            conversation_ttl_minutes: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_horizon_bounds() {
        let config = BusinessConfig {
            booking_horizon_months: 0,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidHorizon(0)));
    }
}
