//! Deployment history
//!
//! Every run is recorded with its minted resource names, including
//! failed runs. There is no automatic rollback, so the history is the
//! operator's ledger of what a partial failure left behind in Azure.

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteDeploymentStore;

pub use crate::core::DeploymentStatus;
use crate::core::DeploymentPlan;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one deployment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Unique run ID
    pub deployment_id: Uuid,

    /// Resource group the run targeted
    pub resource_group: String,

    /// Storage account name minted for the run
    pub storage_account: String,

    /// Function app name minted for the run
    pub function_app: String,

    /// Azure region
    pub location: String,

    /// Final status of the run
    pub status: DeploymentStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed or failed
    pub completed_at: Option<DateTime<Utc>>,

    /// The step that aborted the run, if any
    pub failed_step: Option<String>,
}

/// Trait for persistence backends
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Save a deployment record
    async fn save_deployment(&self, record: &DeploymentRecord) -> Result<()>;

    /// Load a record by ID
    async fn load_deployment(&self, deployment_id: Uuid) -> Result<Option<DeploymentRecord>>;

    /// List the most recent deployments, newest first
    async fn list_deployments(&self, limit: usize) -> Result<Vec<DeploymentRecord>>;
}

/// In-memory persistence (for testing or `--no-history` runs)
pub struct InMemoryPersistence {
    records: tokio::sync::RwLock<Vec<DeploymentRecord>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            records: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for InMemoryPersistence {
    async fn save_deployment(&self, record: &DeploymentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.retain(|r| r.deployment_id != record.deployment_id);
        records.push(record.clone());
        Ok(())
    }

    async fn load_deployment(&self, deployment_id: Uuid) -> Result<Option<DeploymentRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.deployment_id == deployment_id)
            .cloned())
    }

    async fn list_deployments(&self, limit: usize) -> Result<Vec<DeploymentRecord>> {
        let records = self.records.read().await;
        let mut result: Vec<DeploymentRecord> = records.clone();
        result.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        result.truncate(limit);
        Ok(result)
    }
}

/// Build a record from a finished (or aborted) plan
pub fn create_record(plan: &DeploymentPlan) -> DeploymentRecord {
    DeploymentRecord {
        deployment_id: plan.state.deployment_id,
        resource_group: plan.names.resource_group.clone(),
        storage_account: plan.names.storage_account.clone(),
        function_app: plan.names.function_app.clone(),
        location: plan.config.location.clone(),
        status: plan.state.status,
        started_at: plan.state.started_at.unwrap_or_else(Utc::now),
        completed_at: plan.state.completed_at,
        failed_step: plan.state.failed_step.clone(),
    }
}
