//! Deployment engine - drives the plan to completion or first failure

use crate::{
    azure::ToolRunner,
    core::{DeploymentPlan, DeploymentStatus, StepId},
    execution::{steps::StepRunner, DeployError},
};
use tracing::{error, info};
use uuid::Uuid;

/// Events emitted during a deployment run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    DeploymentStarted {
        deployment_id: Uuid,
        function_app: String,
        resource_group: String,
    },
    StepStarted {
        step: StepId,
    },
    StepCompleted {
        step: StepId,
        detail: String,
    },
    StepFailed {
        step: StepId,
        error: String,
    },
    StepSkipped {
        step: StepId,
        reason: String,
    },
    ReadinessWaitStarted {
        max_wait_secs: u64,
    },
    DeploymentCompleted {
        deployment_id: Uuid,
        status: DeploymentStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(DeployEvent) + Send + Sync>;

/// Sequential deployment engine.
///
/// Abort-on-error: the first failing step skips everything after it and
/// fails the run. There is no retry and no rollback of resources already
/// created.
pub struct DeployEngine<R> {
    steps: StepRunner<R>,
    event_handlers: Vec<EventHandler>,
}

impl<R: ToolRunner> DeployEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            steps: StepRunner::new(runner),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(DeployEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Box::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: DeployEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the plan from the first step
    pub async fn execute(&self, plan: &mut DeploymentPlan) -> Result<(), DeployError> {
        let deployment_id = plan.state.deployment_id;

        info!(
            "Starting deployment of {} ({})",
            plan.names.function_app, deployment_id
        );
        self.emit_event(DeployEvent::DeploymentStarted {
            deployment_id,
            function_app: plan.names.function_app.clone(),
            resource_group: plan.names.resource_group.clone(),
        });

        plan.state.start(plan.steps.len());

        let names = plan.names.clone();
        let config = plan.config.clone();

        for step in StepId::ALL {
            plan.mark_running(step);
            self.emit_event(DeployEvent::StepStarted { step });

            if step == StepId::WaitForReadiness {
                self.emit_event(DeployEvent::ReadinessWaitStarted {
                    max_wait_secs: config.readiness.max_wait_secs,
                });
            }

            match self.steps.run(step, &names, &config).await {
                Ok(detail) => {
                    plan.mark_completed(step, detail.clone());
                    self.emit_event(DeployEvent::StepCompleted { step, detail });
                }
                Err(err) => {
                    error!("Step {} failed: {}", step, err);
                    plan.mark_failed(step, err.to_string());
                    self.emit_event(DeployEvent::StepFailed {
                        step,
                        error: err.to_string(),
                    });

                    for skipped in plan.skip_remaining("earlier step failed") {
                        self.emit_event(DeployEvent::StepSkipped {
                            step: skipped,
                            reason: "earlier step failed".to_string(),
                        });
                    }

                    self.emit_event(DeployEvent::DeploymentCompleted {
                        deployment_id,
                        status: DeploymentStatus::Failed,
                    });
                    return Err(DeployError { step, source: err });
                }
            }
        }

        plan.state.complete();
        info!(
            "Deployment finished: {} - {:?}",
            plan.names.function_app, plan.state.status
        );
        self.emit_event(DeployEvent::DeploymentCompleted {
            deployment_id,
            status: DeploymentStatus::Completed,
        });

        Ok(())
    }
}
