//! Control-plane client port.

use async_trait::async_trait;

use crate::arm::types::{
    ArmError, DeploymentExtended, ResourceGroup, ScopeTarget, ValidationResult,
};
use crate::parameters::DeploymentParameters;

/// Result of a single control-plane call.
pub type ArmResult<T> = std::result::Result<T, ArmError>;

/// Uniform port over the cloud control plane.
///
/// Implementations wrap the provider SDK (HTTP transport, credential flow,
/// long-running-operation polling) and normalize every outcome into
/// `Result<T, ArmError>`, so the orchestration logic never sees
/// transport-specific error shapes. All operations are one-shot: the caller
/// suspends until the underlying operation, including any polling, completes.
#[async_trait]
pub trait ArmClient: Send + Sync {
    /// Check whether the named resource group exists.
    ///
    /// `Ok(false)` means the group is absent; `Err` means the probe itself
    /// failed and the run must not proceed.
    async fn check_existence(&self, resource_group: &str) -> ArmResult<bool>;

    /// Create (or update) the named resource group in the given location.
    async fn create_resource_group(
        &self,
        resource_group: &str,
        location: &str,
    ) -> ArmResult<ResourceGroup>;

    /// Delete the named resource group and everything in it.
    async fn delete_resource_group(&self, resource_group: &str) -> ArmResult<()>;

    /// Dry-run the deployment at the given target without applying changes.
    ///
    /// A 200-class response may still carry a semantic `error`; callers must
    /// treat that as a validation failure.
    async fn validate(
        &self,
        target: &ScopeTarget,
        deployment_name: &str,
        parameters: &DeploymentParameters,
    ) -> ArmResult<ValidationResult>;

    /// Submit the deployment at the given target and poll it to completion.
    async fn create_or_update(
        &self,
        target: &ScopeTarget,
        deployment_name: &str,
        parameters: &DeploymentParameters,
    ) -> ArmResult<DeploymentExtended>;
}
