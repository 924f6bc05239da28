use anyhow::{Context, Result};
use deltadeploy::azure::SubprocessRunner;
use deltadeploy::cli::commands::{DeployCommand, HistoryCommand, PlanCommand};
use deltadeploy::cli::output::*;
use deltadeploy::cli::{Cli, Command};
use deltadeploy::core::{DeployConfig, DeploymentPlan, ResourceNames, StepId};
use deltadeploy::execution::{DeployEngine, DeployEvent};
#[cfg(feature = "sqlite")]
use deltadeploy::persistence::SqliteDeploymentStore;
use deltadeploy::persistence::{
    create_record, DeploymentRecord, InMemoryPersistence, PersistenceBackend,
};
use indicatif::ProgressBar;
use std::sync::{Arc, Mutex};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Deploy(cmd) => run_deploy(cmd).await?,
        Command::Plan(cmd) => show_plan(cmd)?,
        Command::History(cmd) => show_history(cmd).await?,
    }

    Ok(())
}

/// Resolve the effective configuration: file (or defaults) plus overrides
fn load_config(
    path: Option<&String>,
    location: Option<&String>,
    resource_group: Option<&String>,
) -> Result<DeployConfig> {
    let mut config = match path {
        Some(path) => {
            DeployConfig::from_file(path).context("Failed to load deployment config")?
        }
        None => DeployConfig::default(),
    };

    if let Some(location) = location {
        config.location = location.clone();
    }
    if let Some(resource_group) = resource_group {
        config.resource_group = resource_group.clone();
    }

    // Overrides can invalidate a config that validated at load
    config.validate()?;
    Ok(config)
}

async fn run_deploy(cmd: &DeployCommand) -> Result<()> {
    let config = load_config(
        cmd.config.as_ref(),
        cmd.location.as_ref(),
        cmd.resource_group.as_ref(),
    )?;

    let names = ResourceNames::fresh(&config);
    names.validate()?;

    let mut plan = DeploymentPlan::new(config.clone(), names);

    // Set up persistence
    #[cfg(feature = "sqlite")]
    let store: Arc<dyn PersistenceBackend> = if cmd.no_history {
        Arc::new(InMemoryPersistence::new())
    } else {
        Arc::new(SqliteDeploymentStore::with_default_path().await?)
    };
    #[cfg(not(feature = "sqlite"))]
    let store: Arc<dyn PersistenceBackend> = Arc::new(InMemoryPersistence::new());

    let runner = SubprocessRunner::from_config(&config);
    let mut engine = DeployEngine::new(runner);

    // Console output for every event, with a spinner during the
    // readiness wait
    let spinner: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));
    engine.add_event_handler({
        let spinner = spinner.clone();
        move |event| {
            match &event {
                DeployEvent::ReadinessWaitStarted { max_wait_secs } => {
                    let bar = create_spinner(format!(
                        "Waiting for the app to come up (up to {}s)",
                        max_wait_secs
                    ));
                    if let Ok(mut slot) = spinner.lock() {
                        *slot = Some(bar);
                    }
                    return;
                }
                DeployEvent::StepCompleted { step, .. }
                | DeployEvent::StepFailed { step, .. }
                    if *step == StepId::WaitForReadiness =>
                {
                    if let Ok(mut slot) = spinner.lock() {
                        if let Some(bar) = slot.take() {
                            bar.finish_and_clear();
                        }
                    }
                }
                _ => {}
            }
            println!("{}", format_deploy_event(&event));
        }
    });

    println!();
    let result = engine.execute(&mut plan).await;

    // Record the run, successful or not
    if !cmd.no_history {
        let record = create_record(&plan);
        store.save_deployment(&record).await?;
        println!(
            "\n{} Run saved to history (ID: {})",
            INFO,
            style(&record.deployment_id.to_string()[..8]).dim()
        );
    }

    match result {
        Ok(()) => {
            print_summary(&plan);
            Ok(())
        }
        Err(err) => {
            println!(
                "\n{} Deployment of {} {}",
                CROSS,
                style(&plan.names.function_app).bold(),
                style("failed").red()
            );
            if plan.has_created_resources() {
                println!(
                    "{} Resources already created were left in place. Remove them with:",
                    WARN
                );
                println!("  {}", style(cleanup_hint(&plan)).bold());
            }
            error!("{}", err);
            std::process::exit(1);
        }
    }
}

fn show_plan(cmd: &PlanCommand) -> Result<()> {
    let config = load_config(
        cmd.config.as_ref(),
        cmd.location.as_ref(),
        cmd.resource_group.as_ref(),
    )?;

    let plan = config.to_plan();

    if cmd.json {
        let data = serde_json::json!({
            "names": plan.names,
            "location": plan.config.location,
            "base_url": plan.base_url(),
            "steps": StepId::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Deployment plan (names are minted fresh per run):", INFO);
    println!();
    println!("  Resource group:  {}", style(&plan.names.resource_group).bold());
    println!("  Location:        {}", style(&plan.config.location).bold());
    println!("  Storage account: {}", style(&plan.names.storage_account).bold());
    println!("  Function app:    {}", style(&plan.names.function_app).bold());
    println!("  Base URL:        {}", style(plan.base_url()).cyan());
    println!();
    println!("  Steps:");
    for (i, step) in StepId::ALL.iter().enumerate() {
        println!("    {}. {}", i + 1, step.title());
    }

    Ok(())
}

async fn show_history(cmd: &HistoryCommand) -> Result<()> {
    #[cfg(feature = "sqlite")]
    let store: Arc<dyn PersistenceBackend> = Arc::new(SqliteDeploymentStore::with_default_path().await?);
    #[cfg(not(feature = "sqlite"))]
    let store: Arc<dyn PersistenceBackend> = Arc::new(InMemoryPersistence::new());

    // If a specific deployment ID is requested
    if let Some(id_str) = &cmd.deployment_id {
        let deployment_id =
            uuid::Uuid::parse_str(id_str).context("Invalid deployment ID format")?;
        match store.load_deployment(deployment_id).await? {
            Some(record) => print_deployment_details(&record, cmd.verbose)?,
            None => println!("{} Deployment not found", WARN),
        }
        return Ok(());
    }

    let records = store.list_deployments(cmd.limit).await?;

    if records.is_empty() {
        println!("{} No deployments found in history", INFO);
        return Ok(());
    }

    if cmd.json {
        let data = serde_json::json!({ "deployments": records });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Deployment history (showing latest {}):", INFO, cmd.limit);
    for record in &records {
        println!("  {}", format_record(record));
    }

    Ok(())
}

fn print_deployment_details(record: &DeploymentRecord, verbose: bool) -> Result<()> {
    println!("{} Deployment Details", INFO);
    println!("  ID: {}", style(record.deployment_id).cyan());
    println!("  Function app: {}", style(&record.function_app).bold());
    println!("  Storage account: {}", style(&record.storage_account).bold());
    println!("  Resource group: {}", style(&record.resource_group).bold());
    println!("  Location: {}", style(&record.location).bold());
    println!("  Status: {}", format_status(record.status));
    println!("  Started: {}", style(record.started_at.to_rfc3339()).dim());
    if let Some(completed) = record.completed_at {
        println!("  Completed: {}", style(completed.to_rfc3339()).dim());
        if let Ok(duration) = completed.signed_duration_since(record.started_at).to_std() {
            println!("  Duration: {}", style(format_duration(duration)).dim());
        }
    }
    if let Some(step) = &record.failed_step {
        println!("  Failed at: {}", style(step).red());
    }

    if verbose {
        println!("\n  {}", style("Full details:").bold());
        let json = serde_json::to_string_pretty(record)?;
        for line in json.lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}

fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
