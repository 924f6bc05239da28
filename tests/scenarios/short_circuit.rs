//! Test: Short Circuit - a failing provisioning step stops the sequence

use crate::helpers::*;
use deltadeploy::azure::ToolError;
use deltadeploy::core::StepId;

fn command_failed(stderr: &str) -> Result<deltadeploy::azure::ToolOutput, ToolError> {
    Err(ToolError::CommandFailed {
        tool: "az",
        code: 1,
        stderr: stderr.to_string(),
    })
}

/// A failed resource group create stops everything after it
#[tokio::test]
async fn test_group_create_failure_short_circuits() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        command_failed("InvalidResourceGroupLocation"),
    ];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_failed(&result, StepId::CreateResourceGroup);
    assert_step_skipped(&result, StepId::CreateStorageAccount);
    assert_step_skipped(&result, StepId::CreateFunctionApp);
    assert_step_skipped(&result, StepId::PublishApp);

    assert_invoked(&result, "group create");
    assert_not_invoked(&result, "storage account create");
    assert_not_invoked(&result, "functionapp create");
    assert_not_invoked(&result, "publish");
}

/// A failed storage account create leaves the function app uncreated
#[tokio::test]
async fn test_storage_create_failure_short_circuits() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        command_failed("StorageAccountAlreadyTaken"),
    ];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_completed(&result, StepId::CreateResourceGroup);
    assert_step_failed(&result, StepId::CreateStorageAccount);
    assert_step_skipped(&result, StepId::CreateFunctionApp);

    assert_not_invoked(&result, "functionapp create");
    assert_not_invoked(&result, "publish");

    // The resource group was created and is now orphaned
    assert!(result.plan.has_created_resources());
}

/// The failing step is named in the error and the run state
#[tokio::test]
async fn test_failure_names_the_step() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        command_failed("boom"),
    ];

    let result = run_deploy_with(responses).await;

    let err = result.result.as_ref().unwrap_err();
    assert_eq!(err.step, StepId::CreateStorageAccount);
    assert_eq!(
        result.plan.state.failed_step.as_deref(),
        Some("create-storage-account")
    );
    // The tool's own stderr is carried through
    assert!(err.to_string().contains("boom"));
}
