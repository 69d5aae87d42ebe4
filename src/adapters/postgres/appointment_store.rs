//! PostgreSQL implementation of AppointmentStore.
//!
//! `reserve` runs the overlap check and the insert in one transaction that
//! first takes a transaction-scoped advisory lock keyed by the business
//! date. Two reservations for the same day therefore serialize, and the
//! second one sees the first one's row.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    AppointmentId, AppointmentStatus, ClientId, DomainError, ErrorCode, Timestamp,
};
use crate::domain::scheduling::Appointment;
use crate::ports::{AppointmentStore, ReserveOutcome};

const COLUMNS: &str =
    "id, client_id, service_name, price_cents, start_at, duration_minutes, status, created_at";

#[derive(Clone)]
pub struct PostgresAppointmentStore {
    pool: PgPool,
}

impl PostgresAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Advisory lock key shared by every reservation on `date`.
fn day_lock_key(date: NaiveDate) -> String {
    format!("appointments:{}", date.format("%Y-%m-%d"))
}

#[async_trait]
impl AppointmentStore for PostgresAppointmentStore {
    async fn reserve(
        &self,
        appointment: &Appointment,
        business_date: NaiveDate,
    ) -> Result<ReserveOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(day_lock_key(business_date))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to lock booking day", e))?;

        let window = appointment.window();
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM appointments
                WHERE status = 'scheduled'
                  AND start_at < $2
                  AND start_at + make_interval(mins => duration_minutes) > $1
            )
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to check overlap", e))?;

        if taken {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("Failed to roll back", e))?;
            return Ok(ReserveOutcome::Conflict);
        }

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, client_id, service_name, price_cents, start_at,
                duration_minutes, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.client_id.as_uuid())
        .bind(&appointment.service_name)
        .bind(appointment.price_cents)
        .bind(appointment.start.as_datetime())
        .bind(appointment.duration_minutes as i32)
        .bind(appointment.status.as_str())
        .bind(appointment.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to insert appointment", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit reservation", e))?;

        Ok(ReserveOutcome::Reserved)
    }

    async fn find_scheduled_overlapping(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM appointments
            WHERE status = 'scheduled'
              AND start_at < $2
              AND start_at + make_interval(mins => duration_minutes) > $1
            ORDER BY start_at
            "#
        ))
        .bind(from.as_datetime())
        .bind(to.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch appointments", e))?;

        rows.iter().map(row_to_appointment).collect()
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM appointments WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch appointment", e))?;

        row.as_ref().map(row_to_appointment).transpose()
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE appointments SET status = $2 WHERE id = $1 AND status = $3")
            .bind(id.as_uuid())
            .bind(to.as_str())
            .bind(from.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to update appointment status", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing matched: either the row is gone or its status moved on
        let exists = sqlx::query("SELECT 1 FROM appointments WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch appointment", e))?
            .is_some();
        if !exists {
            return Err(DomainError::new(
                ErrorCode::AppointmentNotFound,
                format!("Appointment {} not found", id),
            ));
        }

        Ok(false)
    }

    async fn find_upcoming_by_client(
        &self,
        client_id: &ClientId,
        from: &Timestamp,
    ) -> Result<Vec<Appointment>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM appointments
            WHERE client_id = $1 AND status = 'scheduled' AND start_at >= $2
            ORDER BY start_at
            "#
        ))
        .bind(client_id.as_uuid())
        .bind(from.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch client appointments", e))?;

        rows.iter().map(row_to_appointment).collect()
    }
}

fn row_to_appointment(row: &PgRow) -> Result<Appointment, DomainError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::database("Failed to get id", e))?;
    let client_id: Uuid = row
        .try_get("client_id")
        .map_err(|e| DomainError::database("Failed to get client_id", e))?;
    let service_name: String = row
        .try_get("service_name")
        .map_err(|e| DomainError::database("Failed to get service_name", e))?;
    let price_cents: i64 = row
        .try_get("price_cents")
        .map_err(|e| DomainError::database("Failed to get price_cents", e))?;
    let start_at: DateTime<Utc> = row
        .try_get("start_at")
        .map_err(|e| DomainError::database("Failed to get start_at", e))?;
    let duration: i32 = row
        .try_get("duration_minutes")
        .map_err(|e| DomainError::database("Failed to get duration_minutes", e))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| DomainError::database("Failed to get status", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database("Failed to get created_at", e))?;

    Ok(Appointment {
        id: AppointmentId::from_uuid(id),
        client_id: ClientId::from_uuid(client_id),
        service_name,
        price_cents,
        start: Timestamp::from_datetime(start_at),
        duration_minutes: u32::try_from(duration)
            .map_err(|e| DomainError::database("Invalid stored duration", e))?,
        status: status
            .parse()
            .map_err(|e| DomainError::database("Invalid stored status", e))?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
