//! Typed operations over the Azure CLI

use crate::azure::{Tool, ToolError, ToolRunner};
use crate::core::config::RuntimeConfig;
use crate::core::names::ResourceNames;
use std::sync::Arc;
use tracing::debug;

/// The identity behind the active `az` session
#[derive(Debug, Clone)]
pub struct LoginInfo {
    /// Signed-in user (or service principal) name
    pub user: String,

    /// Active subscription name
    pub subscription: String,
}

/// Client for the Azure CLI control-plane operations
#[derive(Debug, Clone)]
pub struct AzCli<R> {
    runner: Arc<R>,
}

impl<R: ToolRunner> AzCli<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Probe that the CLI is installed, returning its version
    pub async fn version(&self) -> Result<String, ToolError> {
        let output = self
            .runner
            .run(Tool::Az, &["version", "-o", "json"])
            .await?;

        // Best effort: `az version` reports {"azure-cli": "2.x.y", ...}
        let version = serde_json::from_str::<serde_json::Value>(&output.stdout)
            .ok()
            .and_then(|v| v["azure-cli"].as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(version)
    }

    /// Verify there is an authenticated session.
    ///
    /// A failing `az account show` means no session; the CLI's own
    /// message is carried in the error detail.
    pub async fn account_show(&self) -> Result<LoginInfo, ToolError> {
        let output = self
            .runner
            .run(Tool::Az, &["account", "show", "-o", "json"])
            .await
            .map_err(|e| match e {
                ToolError::CommandFailed { stderr, .. } => ToolError::NotLoggedIn {
                    detail: if stderr.is_empty() {
                        "az account show failed".to_string()
                    } else {
                        stderr
                    },
                },
                other => other,
            })?;

        let account: serde_json::Value =
            serde_json::from_str(&output.stdout).map_err(|e| {
                ToolError::Internal(format!("Unexpected `az account show` output: {}", e))
            })?;

        Ok(LoginInfo {
            user: account["user"]["name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            subscription: account["name"].as_str().unwrap_or("unknown").to_string(),
        })
    }

    /// Create the resource group scoping the deployment
    pub async fn create_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> Result<(), ToolError> {
        self.runner
            .run(
                Tool::Az,
                &[
                    "group",
                    "create",
                    "--name",
                    name,
                    "--location",
                    location,
                    "-o",
                    "json",
                ],
            )
            .await?;
        Ok(())
    }

    /// Create the storage account backing the function app.
    ///
    /// Standard_LRS is the cost-minimal redundancy tier.
    pub async fn create_storage_account(
        &self,
        name: &str,
        resource_group: &str,
        location: &str,
    ) -> Result<(), ToolError> {
        self.runner
            .run(
                Tool::Az,
                &[
                    "storage",
                    "account",
                    "create",
                    "--name",
                    name,
                    "--resource-group",
                    resource_group,
                    "--location",
                    location,
                    "--sku",
                    "Standard_LRS",
                    "-o",
                    "json",
                ],
            )
            .await?;
        Ok(())
    }

    /// Create the function app on a consumption plan
    pub async fn create_function_app(
        &self,
        names: &ResourceNames,
        runtime: &RuntimeConfig,
        location: &str,
    ) -> Result<(), ToolError> {
        self.runner
            .run(
                Tool::Az,
                &[
                    "functionapp",
                    "create",
                    "--name",
                    &names.function_app,
                    "--resource-group",
                    &names.resource_group,
                    "--storage-account",
                    &names.storage_account,
                    "--consumption-plan-location",
                    location,
                    "--runtime",
                    &runtime.stack,
                    "--runtime-version",
                    &runtime.version,
                    "--functions-version",
                    &runtime.functions_version,
                    "--os-type",
                    &runtime.os,
                    "-o",
                    "json",
                ],
            )
            .await?;
        Ok(())
    }

    /// Query the app's reported state ("Running" once it is up)
    pub async fn function_app_state(
        &self,
        app: &str,
        resource_group: &str,
    ) -> Result<String, ToolError> {
        let output = self
            .runner
            .run(
                Tool::Az,
                &[
                    "functionapp",
                    "show",
                    "--name",
                    app,
                    "--resource-group",
                    resource_group,
                    "--query",
                    "state",
                    "-o",
                    "json",
                ],
            )
            .await?;

        let state: String = serde_json::from_str(&output.stdout).map_err(|e| {
            ToolError::Internal(format!("Unexpected `az functionapp show` output: {}", e))
        })?;

        debug!("Function app {} reports state {}", app, state);
        Ok(state)
    }
}
