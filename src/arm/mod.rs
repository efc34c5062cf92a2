//! # Control-Plane Adapter
//!
//! Wire types and the client port for the cloud control plane. Every call is
//! normalized to `Result<T, ArmError>` at this one boundary, keeping the
//! retry and validation logic free of transport-specific error shapes.

mod client;
mod types;

pub use client::{ArmClient, ArmResult};
pub use types::{
    ArmError, DeploymentExtended, DeploymentPropertiesExtended, ResourceGroup, ScopeTarget,
    ValidationResult,
};
