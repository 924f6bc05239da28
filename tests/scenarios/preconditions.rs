//! Test: Preconditions - missing CLI and missing session abort before
//! anything is created

use crate::helpers::*;
use deltadeploy::azure::ToolError;
use deltadeploy::core::StepId;

/// If az is not installed, nothing is created
#[tokio::test]
async fn test_missing_az_aborts_before_any_create() {
    let responses = vec![Err(ToolError::NotInstalled {
        tool: "az",
        hint: "install it",
    })];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_failed(&result, StepId::CheckAzureCli);
    assert_step_skipped(&result, StepId::CheckLogin);
    assert_step_skipped(&result, StepId::CreateResourceGroup);
    assert_step_skipped(&result, StepId::PublishApp);

    // No create command was ever issued
    assert_not_invoked(&result, "group create");
    assert_not_invoked(&result, "storage account create");
    assert_not_invoked(&result, "functionapp create");
}

/// If az is installed but there is no session, nothing is created
#[tokio::test]
async fn test_unauthenticated_session_aborts_before_any_create() {
    let responses = vec![
        az_version_ok(),
        Err(ToolError::CommandFailed {
            tool: "az",
            code: 1,
            stderr: "Please run 'az login' to setup account.".to_string(),
        }),
    ];

    let result = run_deploy_with(responses).await;

    assert!(result.is_failed());
    assert_step_completed(&result, StepId::CheckAzureCli);
    assert_step_failed(&result, StepId::CheckLogin);

    // account_show maps the failure to the login remediation
    let err = result.result.as_ref().unwrap_err();
    assert!(matches!(err.source, ToolError::NotLoggedIn { .. }));
    assert!(err.to_string().contains("az login"));

    assert_not_invoked(&result, "group create");
    assert_not_invoked(&result, "storage account create");
    assert_not_invoked(&result, "functionapp create");
}

/// Precondition failures never leave resources behind
#[tokio::test]
async fn test_precondition_failure_reports_no_created_resources() {
    let responses = vec![Err(ToolError::NotInstalled {
        tool: "az",
        hint: "install it",
    })];

    let result = run_deploy_with(responses).await;
    assert!(!result.plan.has_created_resources());
}
