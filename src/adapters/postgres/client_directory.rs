//! PostgreSQL implementation of ClientDirectory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::client::Client;
use crate::domain::foundation::{AccountId, ClientId, DomainError, PhoneNumber, Timestamp};
use crate::ports::ClientDirectory;

#[derive(Clone)]
pub struct PostgresClientDirectory {
    pool: PgPool,
}

impl PostgresClientDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientDirectory for PostgresClientDirectory {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Client>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, phone, account_id, created_at FROM clients WHERE phone = $1",
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch client", e))?;

        row.as_ref().map(row_to_client).transpose()
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        // A concurrent registration of the same phone keeps the first row
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO clients (id, name, phone, account_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (phone) DO NOTHING
                RETURNING id, name, phone, account_id, created_at
            )
            SELECT id, name, phone, account_id, created_at FROM inserted
            UNION ALL
            SELECT id, name, phone, account_id, created_at FROM clients WHERE phone = $3
            LIMIT 1
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(client.phone.as_str())
        .bind(client.account_id.as_str())
        .bind(client.created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert client", e))?;

        row_to_client(&row)
    }
}

fn row_to_client(row: &PgRow) -> Result<Client, DomainError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::database("Failed to get id", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::database("Failed to get name", e))?;
    let phone: String = row
        .try_get("phone")
        .map_err(|e| DomainError::database("Failed to get phone", e))?;
    let account_id: String = row
        .try_get("account_id")
        .map_err(|e| DomainError::database("Failed to get account_id", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database("Failed to get created_at", e))?;

    Ok(Client {
        id: ClientId::from_uuid(id),
        name,
        phone: PhoneNumber::parse(&phone)
            .map_err(|e| DomainError::database("Invalid stored phone", e))?,
        account_id: AccountId::new(account_id)
            .map_err(|e| DomainError::database("Invalid stored account id", e))?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
