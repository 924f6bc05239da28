//! Deployment plan domain model
//!
//! The plan is a fixed, strictly-ordered step sequence: later steps
//! reference resources created by earlier ones, so there is nothing to
//! schedule — the first pending step is always the next one.

use crate::core::{
    config::DeployConfig,
    names::ResourceNames,
    state::{DeploymentState, DeploymentStatus, StepState},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for each step of the deployment sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    CheckAzureCli,
    CheckLogin,
    CreateResourceGroup,
    CreateStorageAccount,
    CreateFunctionApp,
    WaitForReadiness,
    PublishApp,
}

impl StepId {
    /// All steps, in execution order
    pub const ALL: [StepId; 7] = [
        StepId::CheckAzureCli,
        StepId::CheckLogin,
        StepId::CreateResourceGroup,
        StepId::CreateStorageAccount,
        StepId::CreateFunctionApp,
        StepId::WaitForReadiness,
        StepId::PublishApp,
    ];

    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::CheckAzureCli => "check-azure-cli",
            StepId::CheckLogin => "check-login",
            StepId::CreateResourceGroup => "create-resource-group",
            StepId::CreateStorageAccount => "create-storage-account",
            StepId::CreateFunctionApp => "create-function-app",
            StepId::WaitForReadiness => "wait-for-readiness",
            StepId::PublishApp => "publish-app",
        }
    }

    /// Human-readable title for console output
    pub fn title(&self) -> &'static str {
        match self {
            StepId::CheckAzureCli => "Check Azure CLI",
            StepId::CheckLogin => "Check Azure session",
            StepId::CreateResourceGroup => "Create resource group",
            StepId::CreateStorageAccount => "Create storage account",
            StepId::CreateFunctionApp => "Create function app",
            StepId::WaitForReadiness => "Wait for app readiness",
            StepId::PublishApp => "Publish function code",
        }
    }

    /// Whether this step creates a cloud resource
    pub fn creates_resource(&self) -> bool {
        matches!(
            self,
            StepId::CreateResourceGroup | StepId::CreateStorageAccount | StepId::CreateFunctionApp
        )
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step of the plan together with its runtime state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedStep {
    pub id: StepId,
    pub state: StepState,
}

/// One deployment run: resolved parameters, minted names, step states
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Resolved configuration for this run
    pub config: DeployConfig,

    /// Resource names minted for this run
    pub names: ResourceNames,

    /// Steps in execution order
    pub steps: Vec<PlannedStep>,

    /// Run-level state
    pub state: DeploymentState,
}

impl DeploymentPlan {
    /// Create a plan with all steps pending
    pub fn new(config: DeployConfig, names: ResourceNames) -> Self {
        let steps = StepId::ALL
            .iter()
            .map(|id| PlannedStep {
                id: *id,
                state: StepState::Pending,
            })
            .collect();

        DeploymentPlan {
            config,
            names,
            steps,
            state: DeploymentState::new(),
        }
    }

    /// Get a step by ID
    pub fn step(&self, id: StepId) -> Option<&PlannedStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Get a mutable step by ID
    pub fn step_mut(&mut self, id: StepId) -> Option<&mut PlannedStep> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    /// Mark a step as running
    pub fn mark_running(&mut self, id: StepId) {
        if let Some(step) = self.step_mut(id) {
            step.state = StepState::Running {
                started_at: Utc::now(),
            };
        }
    }

    /// Mark a step as completed
    pub fn mark_completed(&mut self, id: StepId, detail: String) {
        if let Some(step) = self.step_mut(id) {
            let started_at = match &step.state {
                StepState::Running { started_at } => *started_at,
                _ => Utc::now(),
            };
            step.state = StepState::Completed {
                detail,
                started_at,
                completed_at: Utc::now(),
            };
        }
        self.state.completed_steps = self
            .steps
            .iter()
            .filter(|s| matches!(s.state, StepState::Completed { .. }))
            .count();
    }

    /// Mark a step as failed and the run as aborted
    pub fn mark_failed(&mut self, id: StepId, error: String) {
        if let Some(step) = self.step_mut(id) {
            let started_at = match &step.state {
                StepState::Running { started_at } => *started_at,
                _ => Utc::now(),
            };
            step.state = StepState::Failed {
                error,
                started_at,
                failed_at: Utc::now(),
            };
        }
        self.state.fail(id.as_str());
    }

    /// Skip every step that has not reached a terminal state.
    ///
    /// Returns the skipped step IDs in order.
    pub fn skip_remaining(&mut self, reason: &str) -> Vec<StepId> {
        let mut skipped = Vec::new();
        for step in &mut self.steps {
            if !step.state.is_terminal() {
                step.state = StepState::Skipped {
                    reason: reason.to_string(),
                };
                skipped.push(step.id);
            }
        }
        skipped
    }

    /// Check if every step reached a terminal state
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.state.is_terminal())
    }

    /// Check if the run failed
    pub fn has_failed(&self) -> bool {
        self.state.status == DeploymentStatus::Failed
    }

    /// Whether the run already created cloud resources.
    ///
    /// Used on failure to tell the operator what is left behind.
    pub fn has_created_resources(&self) -> bool {
        self.steps.iter().any(|s| {
            s.id.creates_resource() && matches!(s.state, StepState::Completed { .. })
        })
    }

    /// Base URL of the deployed app
    pub fn base_url(&self) -> String {
        self.names.base_url()
    }
}
