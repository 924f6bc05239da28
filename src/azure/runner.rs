//! Subprocess tool runner

use crate::azure::{Tool, ToolError, ToolOutput, ToolRunner};
use crate::core::config::DeployConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs az and func as subprocesses
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    /// Path to the az executable
    az_path: String,

    /// Path to the func executable
    func_path: String,

    /// Timeout per invocation in seconds
    timeout_secs: u64,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    pub fn new(az_path: String, func_path: String, timeout_secs: u64) -> Self {
        Self {
            az_path,
            func_path,
            timeout_secs,
        }
    }

    /// Create a runner from the deployment configuration
    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(
            config
                .tools
                .az
                .clone()
                .unwrap_or_else(|| Tool::Az.name().to_string()),
            config
                .tools
                .func
                .clone()
                .unwrap_or_else(|| Tool::Func.name().to_string()),
            config.step_timeout_secs,
        )
    }

    fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Az => &self.az_path,
            Tool::Func => &self.func_path,
        }
    }
}

#[async_trait]
impl ToolRunner for SubprocessRunner {
    async fn run(&self, tool: Tool, args: &[&str]) -> Result<ToolOutput, ToolError> {
        let program = self.program(tool);
        debug!("Running {} {}", program, args.join(" "));

        let timeout_duration = Duration::from_secs(self.timeout_secs);

        let result = timeout(
            timeout_duration,
            Command::new(program)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ToolError::Timeout {
            tool: tool.name(),
            secs: self.timeout_secs,
        })?;

        let output = result.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotInstalled {
                tool: tool.name(),
                hint: tool.install_hint(),
            },
            _ => ToolError::Internal(format!("Failed to spawn {}: {}", tool.name(), e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", tool.name(), code, stderr);
            return Err(ToolError::CommandFailed {
                tool: tool.name(),
                code,
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            ToolError::Internal(format!("Failed to decode {} output: {}", tool.name(), e))
        })?;

        debug!("{} returned {} bytes of output", tool.name(), stdout.len());

        Ok(ToolOutput {
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
