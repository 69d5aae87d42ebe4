//! Service catalog entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

const MAX_DURATION_MINUTES: u32 = 8 * 60;

/// A bookable service (haircut, beard trim...).
///
/// Prices are integer cents. An appointment copies the price at booking
/// time, so catalog edits never rewrite past bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    name: String,
    price_cents: i64,
    duration_minutes: u32,
}

impl Service {
    pub fn new(
        name: impl Into<String>,
        price_cents: i64,
        duration_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if price_cents < 0 {
            return Err(ValidationError::out_of_range("price_cents", 0, i64::MAX, price_cents));
        }
        if duration_minutes == 0 || duration_minutes > MAX_DURATION_MINUTES {
            return Err(ValidationError::out_of_range(
                "duration_minutes",
                1,
                MAX_DURATION_MINUTES as i64,
                duration_minutes as i64,
            ));
        }
        Ok(Self {
            name,
            price_cents,
            duration_minutes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Case-insensitive name comparison.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Renders the price as Brazilian currency, e.g. `R$ 35,00`.
    pub fn format_price(&self) -> String {
        format_cents(self.price_cents)
    }
}

/// Renders cents as `R$ 1.234,50`.
pub fn format_cents(cents: i64) -> String {
    let reais = cents / 100;
    let centavos = (cents % 100).abs();

    let digits = reais.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if cents < 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, centavos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_valid_service() {
        let service = Service::new("Corte", 3500, 30).unwrap();
        assert_eq!(service.name(), "Corte");
        assert_eq!(service.duration_minutes(), 30);
        assert_eq!(service.price_cents(), 3500);
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(matches!(
            Service::new("Corte", 3500, 0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_blank_name_and_negative_price() {
        assert!(Service::new("  ", 3500, 30).is_err());
        assert!(Service::new("Corte", -1, 30).is_err());
    }

    #[test]
    fn matches_name_ignores_case() {
        let service = Service::new("Corte e Barba", 5000, 45).unwrap();
        assert!(service.matches_name("corte e barba "));
        assert!(!service.matches_name("corte"));
    }

    #[test]
    fn formats_prices() {
        assert_eq!(format_cents(3500), "R$ 35,00");
        assert_eq!(format_cents(5), "R$ 0,05");
        assert_eq!(format_cents(123456), "R$ 1.234,56");
    }
}
