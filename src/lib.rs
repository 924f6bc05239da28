//! deltadeploy - deployment orchestrator for the Delta Sharing downloader

pub mod azure;
pub mod cli;
pub mod core;
pub mod execution;
pub mod persistence;

// Re-export commonly used types
pub use crate::azure::{AzCli, FuncTools, SubprocessRunner, Tool, ToolError, ToolOutput, ToolRunner};
pub use crate::core::{
    DeployConfig, DeploymentPlan, DeploymentStatus, ResourceNames, StepId, StepState,
};
pub use crate::execution::{DeployEngine, DeployError, DeployEvent};
