//! Azure Functions Core Tools client

use crate::azure::{Tool, ToolError, ToolRunner};
use std::sync::Arc;

/// Client for the `func` packaging/publish tool
#[derive(Debug, Clone)]
pub struct FuncTools<R> {
    runner: Arc<R>,
}

impl<R: ToolRunner> FuncTools<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Probe that Core Tools is installed, returning its version
    pub async fn version(&self) -> Result<String, ToolError> {
        let output = self.runner.run(Tool::Func, &["--version"]).await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Publish the current directory's source tree to the named app
    pub async fn publish(&self, app: &str, stack: &str) -> Result<(), ToolError> {
        let mut args = vec!["azure", "functionapp", "publish", app];
        if let Some(flag) = stack_flag(stack) {
            args.push(flag);
        }
        self.runner.run(Tool::Func, &args).await?;
        Ok(())
    }
}

/// Map a runtime stack to the matching `func publish` worker flag
fn stack_flag(stack: &str) -> Option<&'static str> {
    match stack {
        "python" => Some("--python"),
        "node" => Some("--javascript"),
        "dotnet-isolated" => Some("--csharp"),
        "java" => Some("--java"),
        "powershell" => Some("--powershell"),
        _ => None,
    }
}
