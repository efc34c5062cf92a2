#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # armdeploy-core
//!
//! Deployment orchestration core for ARM template pipeline tasks.
//!
//! ## Overview
//!
//! This crate is the decision-making heart of a pipeline task that applies an
//! infrastructure template at one of three organizational scopes: a resource
//! group, a subscription, or a management group. It decides whether the
//! target resource group must be created, chooses between a dry-run
//! validation and a real deployment, submits the deployment, retries the one
//! transient consistency error worth retrying, and propagates deployment
//! outputs back to the caller.
//!
//! Everything around that core is a collaborator consumed at a trait
//! boundary: template resolution ([`template::TemplateResolver`]), the
//! control-plane client ([`arm::ArmClient`]), and the run-scoped variable
//! store ([`outputs::OutputSink`]). Credential acquisition, input parsing,
//! and the HTTP/long-running-operation plumbing live in the host task.
//!
//! ## Control Flow
//!
//! ```text
//! host task ──▶ ScopeDeployer::from_context (validates parameters)
//!                   │
//!                   ├─ resource group scope: ensure group exists, then
//!                   │  submit; retry ResourceGroupNotFound up to the budget
//!                   ├─ subscription scope: stamp location, submit once
//!                   └─ management group scope: stamp location, submit once
//!                   │
//!                   └──▶ validate (dry run) or create_or_update, then
//!                        publish properties.outputs as a named variable
//! ```
//!
//! A failed deployment is reported, not compensated: there is no rollback of
//! partially-applied templates, and a resource group created along the way is
//! left in place.
//!
//! ## Module Organization
//!
//! - [`arm`] - Control-plane wire types and the client port
//! - [`config`] - Task parameters, scopes, retry configuration
//! - [`deployers`] - One deployer per scope, selected from the configured scope
//! - [`parameters`] - The deployment parameter payload
//! - [`template`] - Template resolution port
//! - [`outputs`] - Output variable propagation
//! - [`state`] - Run state machine
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup and helpers
//! - [`messages`] - Message catalog identifiers

pub mod arm;
pub mod config;
pub mod constants;
pub mod deployers;
pub mod error;
pub mod logging;
pub mod messages;
pub mod outputs;
pub mod parameters;
pub mod state;
pub mod template;

pub use config::{DeploymentMode, DeploymentScope, RetryConfig, TaskParameters, TemplateLocation};
pub use deployers::{Deploy, DeployerContext, ScopeDeployer};
pub use error::{DeploymentTaskError, Result};
pub use parameters::DeploymentParameters;
pub use state::DeploymentRunState;
