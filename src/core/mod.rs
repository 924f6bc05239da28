//! Core domain models

pub mod config;
pub mod names;
pub mod plan;
pub mod state;

pub use config::{DeployConfig, ReadinessConfig, RuntimeConfig};
pub use names::ResourceNames;
pub use plan::{DeploymentPlan, PlannedStep, StepId};
pub use state::{DeploymentState, DeploymentStatus, StepState};
