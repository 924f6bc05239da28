//! Test: Publish Failure - provisioning succeeded but the publish step
//! fails, leaving resources behind

use crate::helpers::*;
use deltadeploy::azure::ToolError;
use deltadeploy::core::{DeploymentStatus, StepId};
use deltadeploy::persistence::create_record;

/// Missing Core Tools fails the run after provisioning
#[tokio::test]
async fn test_missing_func_fails_after_provisioning() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        ok("{}"),
        ok("{}"),
        ok(r#""Running""#),
        Err(ToolError::NotInstalled {
            tool: "func",
            hint: "npm install -g azure-functions-core-tools@4",
        }),
    ];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_completed(&result, StepId::CreateResourceGroup);
    assert_step_completed(&result, StepId::CreateStorageAccount);
    assert_step_completed(&result, StepId::CreateFunctionApp);
    assert_step_failed(&result, StepId::PublishApp);

    // The remediation hint survives to the error message
    let err = result.result.as_ref().unwrap_err();
    assert!(err.to_string().contains("azure-functions-core-tools"));

    // Everything provisioned is now orphaned and must be reported
    assert!(result.plan.has_created_resources());
}

/// A failing `func publish` is a failed run, not a success with caveats
#[tokio::test]
async fn test_publish_command_failure_fails_the_run() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        ok("{}"),
        ok("{}"),
        ok(r#""Running""#),
        ok("4.0.5455"),
        Err(ToolError::CommandFailed {
            tool: "func",
            code: 1,
            stderr: "Can't find app with name ...".to_string(),
        }),
    ];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_failed(&result, StepId::PublishApp);
    assert_eq!(result.plan.state.status, DeploymentStatus::Failed);
}

/// The history record of a publish failure carries the orphaned names
#[tokio::test]
async fn test_failed_run_record_keeps_resource_names() {
    let responses = vec![
        az_version_ok(),
        account_show_ok(),
        ok("{}"),
        ok("{}"),
        ok("{}"),
        ok(r#""Running""#),
        Err(ToolError::NotInstalled {
            tool: "func",
            hint: "install it",
        }),
    ];

    let result = run_deploy_with(responses).await;
    let record = create_record(&result.plan);

    assert_eq!(record.status, DeploymentStatus::Failed);
    assert_eq!(record.failed_step.as_deref(), Some("publish-app"));
    assert_eq!(record.storage_account, result.plan.names.storage_account);
    assert_eq!(record.function_app, result.plan.names.function_app);
}
