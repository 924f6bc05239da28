//! CLI command definitions

use clap::Args;

/// Provision the infrastructure and publish the app
#[derive(Debug, Args, Clone)]
pub struct DeployCommand {
    /// Path to a deployment config YAML (defaults are compiled in)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Azure region override
    #[arg(long)]
    pub location: Option<String>,

    /// Resource group name override
    #[arg(long)]
    pub resource_group: Option<String>,

    /// Don't record this run in the deployment history
    #[arg(long)]
    pub no_history: bool,
}

/// Show what a deployment would create
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Path to a deployment config YAML (defaults are compiled in)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Azure region override
    #[arg(long)]
    pub location: Option<String>,

    /// Resource group name override
    #[arg(long)]
    pub resource_group: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show past deployment runs
#[derive(Debug, Args, Clone)]
pub struct HistoryCommand {
    /// Number of recent deployments to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Show full details
    #[arg(long)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show a specific deployment by ID
    #[arg(long)]
    pub deployment_id: Option<String>,
}
