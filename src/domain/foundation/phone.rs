//! Phone number value object used as the conversation and client key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// Normalized phone number: digits only, 10 to 15 of them.
///
/// Formatting characters (spaces, dashes, parentheses, a leading `+`) are
/// stripped so that `+55 (11) 98765-4321` and `5511987654321` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses and normalizes a phone number.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }

        let mut digits = String::with_capacity(trimmed.len());
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c),
                '+' if i == 0 => {}
                ' ' | '-' | '(' | ')' | '.' => {}
                other => {
                    return Err(ValidationError::invalid_format(
                        "phone",
                        format!("unexpected character '{}'", other),
                    ))
                }
            }
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::out_of_range(
                "phone",
                MIN_DIGITS as i64,
                MAX_DIGITS as i64,
                digits.len() as i64,
            ));
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
