//! PostgreSQL implementation of the catalog ports.
//!
//! Services and work intervals are maintained by the shop's admin tools;
//! this adapter only reads them.

use async_trait::async_trait;
use chrono::{NaiveTime, Weekday};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scheduling::{Service, WorkInterval};
use crate::ports::{ServiceCatalog, WorkingHoursCatalog};

#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceCatalog for PostgresCatalog {
    async fn list_services(&self) -> Result<Vec<Service>, DomainError> {
        let rows = sqlx::query(
            "SELECT name, price_cents, duration_minutes FROM services ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list services", e))?;

        rows.iter().map(row_to_service).collect()
    }

    async fn find_service(&self, name: &str) -> Result<Option<Service>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT name, price_cents, duration_minutes
            FROM services
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch service", e))?;

        row.as_ref().map(row_to_service).transpose()
    }
}

#[async_trait]
impl WorkingHoursCatalog for PostgresCatalog {
    async fn list_work_intervals(&self) -> Result<Vec<WorkInterval>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT weekday, start_time, end_time, active
            FROM work_intervals
            ORDER BY weekday, start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list work intervals", e))?;

        rows.iter().map(row_to_interval).collect()
    }
}

fn row_to_service(row: &PgRow) -> Result<Service, DomainError> {
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::database("Failed to get name", e))?;
    let price_cents: i64 = row
        .try_get("price_cents")
        .map_err(|e| DomainError::database("Failed to get price_cents", e))?;
    let duration: i32 = row
        .try_get("duration_minutes")
        .map_err(|e| DomainError::database("Failed to get duration_minutes", e))?;

    let duration = u32::try_from(duration).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative duration stored for service '{}'", name),
        )
    })?;
    Service::new(name, price_cents, duration).map_err(|e| DomainError::database("Invalid service row", e))
}

fn row_to_interval(row: &PgRow) -> Result<WorkInterval, DomainError> {
    let weekday: i16 = row
        .try_get("weekday")
        .map_err(|e| DomainError::database("Failed to get weekday", e))?;
    let start: NaiveTime = row
        .try_get("start_time")
        .map_err(|e| DomainError::database("Failed to get start_time", e))?;
    let end: NaiveTime = row
        .try_get("end_time")
        .map_err(|e| DomainError::database("Failed to get end_time", e))?;
    let active: bool = row
        .try_get("active")
        .map_err(|e| DomainError::database("Failed to get active", e))?;

    WorkInterval::new(weekday_from_index(weekday)?, start, end, active)
        .map_err(|e| DomainError::database("Invalid work interval row", e))
}

/// Stored weekdays count from Monday = 0.
pub(crate) fn weekday_from_index(index: i16) -> Result<Weekday, DomainError> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid weekday index: {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn weekday_index_matches_chrono_numbering() {
        for index in 0..7i16 {
            let weekday = weekday_from_index(index).unwrap();
            assert_eq!(weekday.num_days_from_monday() as i16, index);
        }
        assert!(weekday_from_index(7).is_err());
    }

    #[test]
    fn sunday_is_six() {
        assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sun);
    }
}
