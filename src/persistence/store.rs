//! SQLite-based deployment history store

use crate::core::DeploymentStatus;
use crate::persistence::{DeploymentRecord, PersistenceBackend};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

/// SQLite deployment store
pub struct SqliteDeploymentStore {
    pool: SqlitePool,
}

impl SqliteDeploymentStore {
    /// Create a new SQLite store
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
            .context("Invalid database path")?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Create store with default path
    pub async fn with_default_path() -> Result<Self> {
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let db_dir = data_dir.join("deltadeploy");
        std::fs::create_dir_all(&db_dir)?;

        let db_path = db_dir.join("deployments.db");
        Self::new(db_path.to_str().context("Non-UTF-8 data directory path")?).await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS deployments (
                id TEXT PRIMARY KEY,
                resource_group TEXT NOT NULL,
                storage_account TEXT NOT NULL,
                function_app TEXT NOT NULL,
                location TEXT NOT NULL,
                status TEXT NOT NULL,
                started_at TEXT NOT NULL,
                completed_at TEXT,
                failed_step TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_deployments_started_at ON deployments(started_at);
            CREATE INDEX IF NOT EXISTS idx_deployments_status ON deployments(status);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Convert DateTime<Utc> to NaiveDateTime for SQLite
    fn to_naive(dt: DateTime<Utc>) -> NaiveDateTime {
        dt.naive_utc()
    }

    /// Convert NaiveDateTime to DateTime<Utc>
    fn from_naive(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DeploymentRecord> {
        Ok(DeploymentRecord {
            deployment_id: Uuid::parse_str(&row.get::<String, _>("id"))?,
            resource_group: row.get("resource_group"),
            storage_account: row.get("storage_account"),
            function_app: row.get("function_app"),
            location: row.get("location"),
            status: match row.get::<String, _>("status").as_str() {
                "Pending" => DeploymentStatus::Pending,
                "Running" => DeploymentStatus::Running,
                "Completed" => DeploymentStatus::Completed,
                "Failed" => DeploymentStatus::Failed,
                _ => DeploymentStatus::Pending,
            },
            started_at: Self::from_naive(row.get("started_at")),
            completed_at: row
                .get::<Option<NaiveDateTime>, _>("completed_at")
                .map(Self::from_naive),
            failed_step: row.get("failed_step"),
        })
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for SqliteDeploymentStore {
    async fn save_deployment(&self, record: &DeploymentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO deployments
            (id, resource_group, storage_account, function_app, location, status, started_at, completed_at, failed_step)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(record.deployment_id.to_string())
        .bind(&record.resource_group)
        .bind(&record.storage_account)
        .bind(&record.function_app)
        .bind(&record.location)
        .bind(format!("{:?}", record.status))
        .bind(Self::to_naive(record.started_at))
        .bind(record.completed_at.map(Self::to_naive))
        .bind(&record.failed_step)
        .execute(&self.pool)
        .await
        .context("Failed to save deployment")?;

        Ok(())
    }

    async fn load_deployment(&self, deployment_id: Uuid) -> Result<Option<DeploymentRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, resource_group, storage_account, function_app, location, status, started_at, completed_at, failed_step
            FROM deployments
            WHERE id = ?1
            "#,
        )
        .bind(deployment_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load deployment")?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn list_deployments(&self, limit: usize) -> Result<Vec<DeploymentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, resource_group, storage_account, function_app, location, status, started_at, completed_at, failed_step
            FROM deployments
            ORDER BY started_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list deployments")?;

        rows.iter().map(Self::record_from_row).collect()
    }
}
