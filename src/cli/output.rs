//! CLI output formatting

use crate::{
    core::{DeploymentPlan, DeploymentStatus, StepState},
    execution::DeployEvent,
    persistence::DeploymentRecord,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner for the readiness wait
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a step state for display
pub fn format_step_state(state: &StepState) -> String {
    match state {
        StepState::Pending => style("PENDING").dim().to_string(),
        StepState::Running { .. } => style("RUNNING").yellow().to_string(),
        StepState::Completed { .. } => style("COMPLETED").green().to_string(),
        StepState::Failed { .. } => style("FAILED").red().to_string(),
        StepState::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run status for display
pub fn format_status(status: DeploymentStatus) -> String {
    match status {
        DeploymentStatus::Pending => style("PENDING").dim().to_string(),
        DeploymentStatus::Running => style("RUNNING").yellow().to_string(),
        DeploymentStatus::Completed => style("COMPLETED").green().to_string(),
        DeploymentStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a history record as a one-line summary
pub fn format_record(record: &DeploymentRecord) -> String {
    let status_icon = match record.status {
        DeploymentStatus::Completed => CHECK,
        DeploymentStatus::Failed => CROSS,
        DeploymentStatus::Running => SPINNER,
        _ => INFO,
    };

    let mut line = format!(
        "{} {} - {} - {} - {}",
        status_icon,
        style(&record.deployment_id.to_string()[..8]).dim(),
        style(&record.function_app).bold(),
        format_status(record.status),
        style(record.started_at.to_rfc3339()).dim()
    );

    if let Some(step) = &record.failed_step {
        line.push_str(&format!(" (failed at {})", style(step).red()));
    }

    line
}

/// Format a deployment event for display
pub fn format_deploy_event(event: &DeployEvent) -> String {
    match event {
        DeployEvent::DeploymentStarted {
            deployment_id,
            function_app,
            resource_group,
        } => format!(
            "{} Deploying {} into {} ({})",
            ROCKET,
            style(function_app).bold(),
            style(resource_group).cyan(),
            style(&deployment_id.to_string()[..8]).dim()
        ),
        DeployEvent::StepStarted { step } => {
            format!("{} {}", SPINNER, style(step.title()).cyan())
        }
        DeployEvent::StepCompleted { step, detail } => {
            if detail.is_empty() {
                format!("{} {}", CHECK, style(step.title()).green())
            } else {
                format!(
                    "{} {}: {}",
                    CHECK,
                    style(step.title()).green(),
                    style(detail).dim()
                )
            }
        }
        DeployEvent::StepFailed { step, error } => {
            format!("{} {}: {}", CROSS, style(step.title()).red(), error)
        }
        DeployEvent::StepSkipped { step, reason } => format!(
            "{} {} ({})",
            INFO,
            style(step.title()).dim(),
            style(reason).dim()
        ),
        DeployEvent::ReadinessWaitStarted { max_wait_secs } => format!(
            "{} Waiting for the app to come up (up to {}s)",
            SPINNER, max_wait_secs
        ),
        DeployEvent::DeploymentCompleted {
            deployment_id,
            status,
        } => {
            let status_str = match status {
                DeploymentStatus::Completed => {
                    format!("completed {}", style("successfully").green())
                }
                DeploymentStatus::Failed => style("failed").red().to_string(),
                _ => format!("{:?}", status),
            };
            format!(
                "{} Deployment ({}) {}",
                INFO,
                style(&deployment_id.to_string()[..8]).dim(),
                status_str
            )
        }
    }
}

/// Print the success summary with verification commands
pub fn print_summary(plan: &DeploymentPlan) {
    let base_url = plan.base_url();

    println!();
    println!("{} Deployment complete!", ROCKET);
    println!();
    println!("  Resource group:  {}", style(&plan.names.resource_group).bold());
    println!("  Storage account: {}", style(&plan.names.storage_account).bold());
    println!("  Function app:    {}", style(&plan.names.function_app).bold());
    println!("  Base URL:        {}", style(&base_url).cyan());
    println!();
    println!(
        "Endpoints require a function key; fetch one with {}",
        style(format!(
            "az functionapp keys list --name {} --resource-group {}",
            plan.names.function_app, plan.names.resource_group
        ))
        .dim()
    );
    println!();
    println!("  Health:        curl \"{}/api/health?code=<function-key>\"", base_url);
    println!(
        "  Metadata:      curl -X POST --data-binary @config.share \"{}/api/metadata?code=<function-key>\"",
        base_url
    );
    println!(
        "  Download:      curl -X POST -H \"Content-Type: application/json\" \\\n                      -d '{{\"config\": \"<share-config>\", \"share\": \"<share>\", \"schema\": \"<schema>\", \"table\": \"<table>\"}}' \\\n                      \"{}/api/download?code=<function-key>\" -o table.csv",
        base_url
    );
    println!(
        "  Web interface: open \"{}/api/web_interface?code=<function-key>\"",
        base_url
    );
    println!();
    println!("Verify now:");
    println!(
        "  {}",
        style(format!("curl \"{}/api/health?code=<function-key>\"", base_url)).bold()
    );
}

/// The compensating command for a run that left resources behind
pub fn cleanup_hint(plan: &DeploymentPlan) -> String {
    format!(
        "az group delete --name {} --yes --no-wait",
        plan.names.resource_group
    )
}
