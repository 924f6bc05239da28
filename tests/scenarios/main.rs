//! Scenario-based tests for deltadeploy

#[path = "../helpers.rs"]
mod helpers;

mod preconditions;
mod publish_failure;
mod short_circuit;
mod success_chain;
