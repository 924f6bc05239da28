//! Deployment run state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall status of a deployment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    /// Run has not started
    Pending,
    /// Run is in progress
    Running,
    /// All steps completed
    Completed,
    /// A step failed and the run was aborted
    Failed,
}

/// State of a single deployment step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not run yet
    Pending,
    /// Step is executing
    Running {
        started_at: DateTime<Utc>,
    },
    /// Step finished successfully
    Completed {
        detail: String,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step failed, aborting the run
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Step was cancelled because an earlier step failed
    Skipped {
        reason: String,
    },
}

impl StepState {
    /// Check if the step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepState::Completed { .. } | StepState::Failed { .. } | StepState::Skipped { .. }
        )
    }
}

/// State of the whole deployment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentState {
    /// Unique run ID
    pub deployment_id: Uuid,

    /// Current status
    pub status: DeploymentStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or failed
    pub completed_at: Option<DateTime<Utc>>,

    /// Total number of steps
    pub total_steps: usize,

    /// Number of completed steps
    pub completed_steps: usize,

    /// The step that aborted the run, if any
    pub failed_step: Option<String>,
}

impl DeploymentState {
    /// Create a new pending run state
    pub fn new() -> Self {
        Self {
            deployment_id: Uuid::new_v4(),
            status: DeploymentStatus::Pending,
            started_at: None,
            completed_at: None,
            total_steps: 0,
            completed_steps: 0,
            failed_step: None,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self, total_steps: usize) {
        self.status = DeploymentStatus::Running;
        self.started_at = Some(Utc::now());
        self.total_steps = total_steps;
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = DeploymentStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as failed at the given step
    pub fn fail(&mut self, step: &str) {
        self.status = DeploymentStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.failed_step = Some(step.to_string());
    }

    /// Progress as a fraction (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.completed_steps as f64 / self.total_steps as f64
    }
}

impl Default for DeploymentState {
    fn default() -> Self {
        Self::new()
    }
}
