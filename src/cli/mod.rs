//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{DeployCommand, HistoryCommand, PlanCommand};

/// Deployment orchestrator for the Delta Sharing downloader
#[derive(Debug, Parser, Clone)]
#[command(name = "deltadeploy")]
#[command(author = "Deltadeploy Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Provision Azure resources and publish the Delta Sharing downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Provision the infrastructure and publish the app
    Deploy(DeployCommand),

    /// Show what a deployment would create, without touching Azure
    Plan(PlanCommand),

    /// Show past deployment runs
    History(HistoryCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
