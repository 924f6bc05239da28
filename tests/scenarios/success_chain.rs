//! Test: Success Chain - a fully successful run end to end

use crate::helpers::*;
use deltadeploy::core::{DeploymentStatus, StepId};
use deltadeploy::persistence::create_record;

/// All steps run in order and the plan completes
#[tokio::test]
async fn test_full_run_completes() {
    let result = run_deploy_with(all_ok_responses()).await;

    assert!(result.is_success());
    for step in StepId::ALL {
        assert_step_completed(&result, step);
    }
    assert_eq!(result.plan.state.completed_steps, 7);
    assert_eq!(result.plan.state.total_steps, 7);
}

/// Provisioning happens in the documented order
#[tokio::test]
async fn test_provisioning_order() {
    let result = run_deploy_with(all_ok_responses()).await;

    let position = |fragment: &str| {
        result
            .calls
            .iter()
            .position(|c| c.contains(fragment))
            .unwrap_or_else(|| panic!("No call containing '{}'", fragment))
    };

    assert!(position("account show") < position("group create"));
    assert!(position("group create") < position("storage account create"));
    assert!(position("storage account create") < position("functionapp create --name"));
    assert!(position("functionapp create --name") < position("functionapp show"));
    assert!(position("functionapp show") < position("publish"));
}

/// Create commands carry the minted names and configured location
#[tokio::test]
async fn test_create_commands_use_minted_names() {
    let result = run_deploy_with(all_ok_responses()).await;

    assert_invoked(&result, "group create --name deltashare-rg --location eastus");
    assert_invoked(&result, "storage account create --name deltashare1700000000ab12");
    assert_invoked(
        &result,
        "functionapp create --name deltashare-func-1700000000-ab12",
    );
    assert_invoked(&result, "--runtime python --runtime-version 3.11");
    assert_invoked(
        &result,
        "func azure functionapp publish deltashare-func-1700000000-ab12 --python",
    );
}

/// The computed base URL is the app name under azurewebsites.net
#[tokio::test]
async fn test_base_url_matches_minted_name() {
    let result = run_deploy_with(all_ok_responses()).await;

    assert_eq!(
        result.plan.base_url(),
        "https://deltashare-func-1700000000-ab12.azurewebsites.net"
    );
}

/// A successful run produces a complete history record
#[tokio::test]
async fn test_success_record() {
    let result = run_deploy_with(all_ok_responses()).await;
    let record = create_record(&result.plan);

    assert_eq!(record.status, DeploymentStatus::Completed);
    assert!(record.failed_step.is_none());
    assert!(record.completed_at.is_some());
    assert_eq!(record.resource_group, "deltashare-rg");
    assert_eq!(record.location, "eastus");
}
