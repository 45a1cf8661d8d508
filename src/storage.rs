//! Hydration record persistence.
//!
//! Ownership is enforced in SQL: `update` and `delete` match on both id and
//! username, so a request against someone else's record touches zero rows.

use crate::config::DbConfig;
use crate::errors::{ConfigError, StoreError};
use crate::models::{DailySummary, Hydration, NewHydration};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, StoreError>;

pub const POSTGRES_CLIENT: &str = "postgresql";

const SCHEMA: &str = include_str!("../migrations/0001_create_hydrations.sql");

#[async_trait]
pub trait HydrationRepository: Send + Sync {
    /// Inserts a record and returns its generated id.
    async fn add(&self, hydration: &NewHydration) -> Result<i64>;

    async fn fetch_one(&self, id: i64) -> Result<Hydration>;

    /// Rewrites drink, amount and timestamp of a record owned by
    /// `hydration.username`.
    async fn update(&self, hydration: &Hydration) -> Result<()>;

    async fn delete(&self, hydration: &Hydration) -> Result<()>;

    /// Today's total in ml; 0 when nothing was recorded.
    async fn fetch_daily_amount(&self, username: &str) -> Result<i64>;

    /// Users with at least one record in the trailing seven days.
    async fn fetch_weekly_users(&self) -> Result<Vec<String>>;

    /// Per day-of-month totals over the trailing seven days, ascending.
    async fn fetch_weekly_summary(&self, username: &str) -> Result<Vec<DailySummary>>;

    async fn close(&self);
}

/// PostgreSQL repository over a single persistent connection.
pub struct PgHydrationRepository {
    conn: Mutex<Option<PgConnection>>,
}

impl PgHydrationRepository {
    pub async fn connect(config: &DbConfig) -> std::result::Result<Self, ConnectError> {
        if config.client != POSTGRES_CLIENT {
            return Err(ConfigError::UnsupportedDbClient(config.client.clone()).into());
        }

        let connection = &config.connection;
        let options = PgConnectOptions::new()
            .host(&connection.host)
            .port(connection.port)
            .database(&connection.database)
            .username(&connection.user)
            .password(&connection.password);

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(StoreError::from)?;
        info!(
            host = %connection.host,
            port = connection.port,
            database = %connection.database,
            "connected to database"
        );

        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Creates the `hydrations` table when it is missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        (&mut *conn).execute(SCHEMA).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[async_trait]
impl HydrationRepository for PgHydrationRepository {
    async fn add(&self, hydration: &NewHydration) -> Result<i64> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let id = sqlx::query_scalar::<_, i64>(
            "insert into hydrations(username, drink, amount, modified) \
             values($1, $2, $3, $4) returning id",
        )
        .bind(&hydration.username)
        .bind(&hydration.drink)
        .bind(hydration.amount)
        .bind(hydration.modified)
        .fetch_one(&mut *conn)
        .await?;
        debug!(id, username = %hydration.username, "hydration added");
        Ok(id)
    }

    async fn fetch_one(&self, id: i64) -> Result<Hydration> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        sqlx::query_as::<_, Hydration>(
            "select id, username, drink, amount, modified from hydrations where id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, hydration: &Hydration) -> Result<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let result = sqlx::query(
            "update hydrations set drink = $1, amount = $2, modified = $3 \
             where id = $4 and username = $5",
        )
        .bind(&hydration.drink)
        .bind(hydration.amount)
        .bind(hydration.modified)
        .bind(hydration.id)
        .bind(&hydration.username)
        .execute(&mut *conn)
        .await?;
        debug!(id = hydration.id, rows = result.rows_affected(), "hydration updated");
        Ok(())
    }

    async fn delete(&self, hydration: &Hydration) -> Result<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let result = sqlx::query("delete from hydrations where id = $1 and username = $2")
            .bind(hydration.id)
            .bind(&hydration.username)
            .execute(&mut *conn)
            .await?;
        debug!(id = hydration.id, rows = result.rows_affected(), "hydration deleted");
        Ok(())
    }

    async fn fetch_daily_amount(&self, username: &str) -> Result<i64> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let total = sqlx::query_scalar::<_, Option<i64>>(
            "select sum(amount)::int8 from hydrations \
             where username = $1 and modified::date = now()::date",
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?
        .flatten();
        Ok(total.unwrap_or_default())
    }

    async fn fetch_weekly_users(&self) -> Result<Vec<String>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let users = sqlx::query_scalar::<_, String>(
            "select distinct username from hydrations \
             where modified::date > current_date - 7 order by username",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(users)
    }

    async fn fetch_weekly_summary(&self, username: &str) -> Result<Vec<DailySummary>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "select extract(day from modified)::int4 as day_of_month, \
                    coalesce(sum(amount), 0)::int8 as total_amount \
             from hydrations \
             where username = $1 and modified::date > current_date - 7 \
             group by day_of_month order by day_of_month",
        )
        .bind(username)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, total_amount)| DailySummary {
                day: day.to_string(),
                total_amount,
            })
            .collect())
    }

    async fn close(&self) {
        if let Some(conn) = self.conn.lock().await.take() {
            if let Err(err) = conn.close().await {
                tracing::warn!("failed to close database connection: {err}");
            }
        }
    }
}
