use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{Subscriber, SubscriberEmail};
use crate::store::{StoreError, SubscriberStore};

/// Store backed by the `subscriptions` table.
///
/// Relies on the `UNIQUE (email)` constraint from the migrations to reject
/// concurrent duplicates.
pub struct PostgresSubscriberStore {
    pool: PgPool,
}

impl PostgresSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled migrations to the connected database.
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to migrate the database.")
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    #[tracing::instrument(name = "Find subscriber by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, created_at
            FROM subscriptions
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up a subscriber by email.")?;

        Ok(row.map(|r| subscriber_from_row(&r)).transpose()?)
    }

    #[tracing::instrument(name = "Insert subscriber into the database", skip(self))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscriber, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO subscriptions (id, email, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                StoreError::Duplicate
            }
            e => {
                tracing::error!("Failed to execute query: {:?}", e);
                StoreError::Unexpected(
                    anyhow::Error::new(e).context("Failed to insert a new subscriber."),
                )
            }
        })?;

        Ok(subscriber_from_row(&row)?)
    }
}

fn subscriber_from_row(row: &PgRow) -> Result<Subscriber, anyhow::Error> {
    let id: Uuid = row.try_get("id").context("Missing subscriber id column.")?;
    let email: String = row
        .try_get("email")
        .context("Missing subscriber email column.")?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .context("Missing subscriber created_at column.")?;
    let email = SubscriberEmail::parse(email).map_err(|e| anyhow::anyhow!(e))?;

    Ok(Subscriber {
        id,
        email,
        created_at,
    })
}
