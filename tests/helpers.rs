//! Test utility functions for deltadeploy

use deltadeploy::azure::{Tool, ToolError, ToolOutput, ToolRunner};
use deltadeploy::core::{
    DeployConfig, DeploymentPlan, DeploymentStatus, ResourceNames, StepId, StepState,
};
use deltadeploy::execution::{DeployEngine, DeployError};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Runner that pops one scripted response per invocation and records
/// every call it receives
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<ToolOutput, ToolError>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<ToolOutput, ToolError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the call log; grab it before moving the runner into an
    /// engine
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, tool: Tool, args: &[&str]) -> Result<ToolOutput, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", tool.name(), args.join(" ")));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ToolError::Internal("no scripted response left".into())))
    }
}

/// Config with the readiness wait collapsed so tests run instantly
pub fn test_config() -> DeployConfig {
    let mut config = DeployConfig::default();
    config.readiness.poll_interval_secs = 0;
    config.readiness.max_wait_secs = 0;
    config
}

/// Plan with deterministic names
pub fn test_plan() -> DeploymentPlan {
    let config = test_config();
    let names = ResourceNames::generate(&config, 1700000000, "ab12");
    DeploymentPlan::new(config, names)
}

pub fn ok(stdout: &str) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput::stdout_only(stdout))
}

/// Standard `az version` output
pub fn az_version_ok() -> Result<ToolOutput, ToolError> {
    ok(r#"{"azure-cli": "2.64.0"}"#)
}

/// Standard `az account show` output
pub fn account_show_ok() -> Result<ToolOutput, ToolError> {
    ok(r#"{"name": "Pay-As-You-Go", "user": {"name": "dev@example.com"}}"#)
}

/// Responses for a fully successful run against `test_plan()`
pub fn all_ok_responses() -> Vec<Result<ToolOutput, ToolError>> {
    vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        ok("{}"),
        ok("{}"),
        ok(r#""Running""#),
        ok("4.0.5455"),
        ok("Deployment successful."),
    ]
}

/// Result of running a deployment against a scripted runner
pub struct DeployTestResult {
    pub plan: DeploymentPlan,
    pub result: Result<(), DeployError>,
    pub calls: Vec<String>,
}

impl DeployTestResult {
    pub fn is_success(&self) -> bool {
        self.result.is_ok() && self.plan.state.status == DeploymentStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.plan.state.status == DeploymentStatus::Failed
    }
}

/// Run the standard test plan against scripted responses
pub async fn run_deploy_with(responses: Vec<Result<ToolOutput, ToolError>>) -> DeployTestResult {
    run_plan_with(test_plan(), responses).await
}

/// Run an arbitrary plan against scripted responses
pub async fn run_plan_with(
    mut plan: DeploymentPlan,
    responses: Vec<Result<ToolOutput, ToolError>>,
) -> DeployTestResult {
    let runner = ScriptedRunner::new(responses);
    let calls = runner.calls();

    let engine = DeployEngine::new(runner);
    let result = engine.execute(&mut plan).await;

    let calls = calls.lock().unwrap().clone();
    DeployTestResult {
        plan,
        result,
        calls,
    }
}

/// Assert that some recorded call contains the given fragment
pub fn assert_invoked(result: &DeployTestResult, fragment: &str) {
    assert!(
        result.calls.iter().any(|c| c.contains(fragment)),
        "Expected a call containing '{}', got: {:?}",
        fragment,
        result.calls
    );
}

/// Assert that no recorded call contains the given fragment
pub fn assert_not_invoked(result: &DeployTestResult, fragment: &str) {
    assert!(
        !result.calls.iter().any(|c| c.contains(fragment)),
        "Expected no call containing '{}', got: {:?}",
        fragment,
        result.calls
    );
}

/// Assert a step completed
pub fn assert_step_completed(result: &DeployTestResult, id: StepId) {
    let step = result.plan.step(id).expect("step exists");
    assert!(
        matches!(step.state, StepState::Completed { .. }),
        "Expected step {} completed, got: {:?}",
        id,
        step.state
    );
}

/// Assert a step failed
pub fn assert_step_failed(result: &DeployTestResult, id: StepId) {
    let step = result.plan.step(id).expect("step exists");
    assert!(
        matches!(step.state, StepState::Failed { .. }),
        "Expected step {} failed, got: {:?}",
        id,
        step.state
    );
}

/// Assert a step was skipped
pub fn assert_step_skipped(result: &DeployTestResult, id: StepId) {
    let step = result.plan.step(id).expect("step exists");
    assert!(
        matches!(step.state, StepState::Skipped { .. }),
        "Expected step {} skipped, got: {:?}",
        id,
        step.state
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_runner_pops_in_order() {
        let runner = ScriptedRunner::new(vec![ok("first"), ok("second")]);
        let a = runner.run(Tool::Az, &["version"]).await.unwrap();
        let b = runner.run(Tool::Func, &["--version"]).await.unwrap();
        assert_eq!(a.stdout, "first");
        assert_eq!(b.stdout, "second");

        let calls = runner.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["az version", "func --version"]);
    }

    #[tokio::test]
    async fn test_scripted_runner_errors_when_exhausted() {
        let runner = ScriptedRunner::new(vec![]);
        let result = runner.run(Tool::Az, &["version"]).await;
        assert!(matches!(result, Err(ToolError::Internal(_))));
    }
}
