//! Clients for the external deployment tools (az and func)

pub mod az;
pub mod func;
pub mod runner;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use az::{AzCli, LoginInfo};
pub use func::FuncTools;
pub use runner::SubprocessRunner;

/// The external executables the orchestrator drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Azure CLI
    Az,
    /// Azure Functions Core Tools
    Func,
}

impl Tool {
    /// Default executable name
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Az => "az",
            Tool::Func => "func",
        }
    }

    /// Remediation hint shown when the tool is missing
    pub fn install_hint(&self) -> &'static str {
        match self {
            Tool::Az => {
                "Install it with `brew install azure-cli` (macOS), \
                 `winget install Microsoft.AzureCLI` (Windows), \
                 or see https://aka.ms/install-azure-cli"
            }
            Tool::Func => {
                "Install Azure Functions Core Tools with \
                 `npm install -g azure-functions-core-tools@4`"
            }
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error types for external tool invocations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("`{tool}` was not found on PATH. {hint}")]
    NotInstalled {
        tool: &'static str,
        hint: &'static str,
    },

    #[error("No active Azure session ({detail}). Run `az login` and retry")]
    NotLoggedIn { detail: String },

    #[error("`{tool}` exited with code {code}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("`{tool}` timed out after {secs} seconds")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Captured output of a completed tool invocation
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Output with only stdout set, for tests and simple cases
    pub fn stdout_only(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Trait for running external tools - allows for mock implementations
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run a tool to completion and capture its output.
    ///
    /// A non-zero exit status is an error carrying the tool's stderr.
    async fn run(&self, tool: Tool, args: &[&str]) -> Result<ToolOutput, ToolError>;
}
