//! Step runner - executes individual deployment steps against the tools

use crate::{
    azure::{AzCli, FuncTools, ToolError, ToolRunner},
    core::{config::DeployConfig, names::ResourceNames, StepId},
};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

/// Executes one deployment step at a time
pub struct StepRunner<R> {
    az: AzCli<R>,
    func: FuncTools<R>,
}

impl<R: ToolRunner> StepRunner<R> {
    pub fn new(runner: R) -> Self {
        let runner = Arc::new(runner);
        Self {
            az: AzCli::new(runner.clone()),
            func: FuncTools::new(runner),
        }
    }

    /// Run a step, returning a human-readable detail line on success
    pub async fn run(
        &self,
        step: StepId,
        names: &ResourceNames,
        config: &DeployConfig,
    ) -> Result<String, ToolError> {
        info!("Executing step: {}", step);

        match step {
            StepId::CheckAzureCli => {
                let version = self.az.version().await?;
                Ok(format!("azure-cli {}", version))
            }
            StepId::CheckLogin => {
                let login = self.az.account_show().await?;
                Ok(format!(
                    "logged in as {} ({})",
                    login.user, login.subscription
                ))
            }
            StepId::CreateResourceGroup => {
                self.az
                    .create_resource_group(&names.resource_group, &config.location)
                    .await?;
                Ok(format!("{} in {}", names.resource_group, config.location))
            }
            StepId::CreateStorageAccount => {
                self.az
                    .create_storage_account(
                        &names.storage_account,
                        &names.resource_group,
                        &config.location,
                    )
                    .await?;
                Ok(format!("{} (Standard_LRS)", names.storage_account))
            }
            StepId::CreateFunctionApp => {
                self.az
                    .create_function_app(names, &config.runtime, &config.location)
                    .await?;
                Ok(format!(
                    "{} ({} {} on {}, consumption plan)",
                    names.function_app,
                    config.runtime.stack,
                    config.runtime.version,
                    config.runtime.os
                ))
            }
            StepId::WaitForReadiness => self.wait_for_ready(names, config).await,
            StepId::PublishApp => {
                let tools_version = self.func.version().await?;
                self.func
                    .publish(&names.function_app, &config.runtime.stack)
                    .await?;
                Ok(format!(
                    "published {} with Core Tools {}",
                    names.function_app, tools_version
                ))
            }
        }
    }

    /// Poll the app's reported state until it is Running or the window
    /// elapses.
    ///
    /// Probe failures are treated as "not ready yet": `az functionapp
    /// show` can fail transiently right after creation. If the window
    /// elapses the run proceeds to publish anyway and the publish step
    /// surfaces any real problem.
    async fn wait_for_ready(
        &self,
        names: &ResourceNames,
        config: &DeployConfig,
    ) -> Result<String, ToolError> {
        let poll = Duration::from_secs(config.readiness.poll_interval_secs);
        let max_wait = Duration::from_secs(config.readiness.max_wait_secs);
        let started = Instant::now();
        let deadline = started + max_wait;

        loop {
            match self
                .az
                .function_app_state(&names.function_app, &names.resource_group)
                .await
            {
                Ok(state) if state.eq_ignore_ascii_case("running") => {
                    return Ok(format!(
                        "app reported Running after {}s",
                        started.elapsed().as_secs()
                    ));
                }
                Ok(state) => {
                    debug!("App not ready yet, state: {}", state);
                }
                Err(err) => {
                    debug!("State probe failed, treating as not ready: {}", err);
                }
            }

            if Instant::now() + poll > deadline {
                warn!(
                    "Function app {} did not report Running within {}s, proceeding to publish",
                    names.function_app,
                    config.readiness.max_wait_secs
                );
                return Ok(format!(
                    "readiness window of {}s elapsed, proceeding",
                    config.readiness.max_wait_secs
                ));
            }

            sleep(poll).await;
        }
    }
}
