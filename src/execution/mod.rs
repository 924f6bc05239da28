//! Deployment execution

pub mod engine;
pub mod steps;

use crate::azure::ToolError;
use crate::core::StepId;
use thiserror::Error;

pub use engine::{DeployEngine, DeployEvent, EventHandler};
pub use steps::StepRunner;

/// A deployment run aborted at a specific step
#[derive(Debug, Error)]
#[error("Deployment step '{step}' failed: {source}")]
pub struct DeployError {
    /// The step that failed
    pub step: StepId,

    /// The underlying tool error
    #[source]
    pub source: ToolError,
}
