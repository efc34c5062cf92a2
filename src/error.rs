//! # Deployment Error Types
//!
//! Structured error handling for the deployment orchestration core using
//! thiserror for typed errors instead of `Box<dyn Error>` patterns.
//!
//! Only the transient `ResourceGroupNotFound` case is handled locally (by the
//! bounded retry loop at resource-group scope); every variant here is fatal
//! and surfaces to the caller, which translates it into a failed task run.
//! The raw provider error is logged through
//! [`crate::logging::log_deployment_errors`] before the wrapped error is
//! returned, so operators retain the original cause.

use thiserror::Error;

use crate::arm::ArmError;
use crate::messages;

/// Fatal failures of a deployment run.
#[derive(Error, Debug)]
pub enum DeploymentTaskError {
    /// The existence probe itself failed (not "does not exist").
    #[error("Failed to check the resource group status. Error: {source}")]
    ResourceGroupStatusFetchFailed { source: ArmError },

    #[error("Failed to create the resource group {resource_group}. Error: {source}")]
    ResourceGroupCreationFailed {
        resource_group: String,
        source: ArmError,
    },

    #[error("Could not delete the resource group {resource_group}. Error: {source}")]
    CouldNotDeleteResourceGroup {
        resource_group: String,
        source: ArmError,
    },

    /// The validate call failed at the transport level.
    #[error("Task failed while validating the template deployment. Error: {source}")]
    ValidationFailed { source: ArmError },

    /// The deploy call failed, a semantic error came back from a successful
    /// validate response, or the transient retry budget was exhausted.
    #[error(
        "Task failed while creating or updating the template deployment {deployment_name}. Error: {source}"
    )]
    DeploymentFailed {
        deployment_name: String,
        source: ArmError,
    },

    /// Neither supported template source matches the configured value.
    /// Raised before any network call.
    #[error("The template location '{location}' is not supported. Supported values: 'Linked artifact', 'URL of the file'")]
    InvalidTemplateLocation { location: String },

    /// Cross-field parameter validation failed. Raised before any network call.
    #[error("Invalid task configuration: {message}")]
    Configuration { message: String },
}

impl DeploymentTaskError {
    pub fn resource_group_status_fetch_failed(source: ArmError) -> Self {
        Self::ResourceGroupStatusFetchFailed { source }
    }

    pub fn resource_group_creation_failed(
        resource_group: impl Into<String>,
        source: ArmError,
    ) -> Self {
        Self::ResourceGroupCreationFailed {
            resource_group: resource_group.into(),
            source,
        }
    }

    pub fn could_not_delete_resource_group(
        resource_group: impl Into<String>,
        source: ArmError,
    ) -> Self {
        Self::CouldNotDeleteResourceGroup {
            resource_group: resource_group.into(),
            source,
        }
    }

    pub fn validation_failed(source: ArmError) -> Self {
        Self::ValidationFailed { source }
    }

    pub fn deployment_failed(deployment_name: impl Into<String>, source: ArmError) -> Self {
        Self::DeploymentFailed {
            deployment_name: deployment_name.into(),
            source,
        }
    }

    pub fn invalid_template_location(location: impl Into<String>) -> Self {
        Self::InvalidTemplateLocation {
            location: location.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Catalog identifier the host task localizes this failure under.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::ResourceGroupStatusFetchFailed { .. } => messages::RESOURCE_GROUP_STATUS_FETCH_FAILED,
            Self::ResourceGroupCreationFailed { .. } => messages::RESOURCE_GROUP_CREATION_FAILED,
            Self::CouldNotDeleteResourceGroup { .. } => messages::COULD_NOT_DELETE_RESOURCE_GROUP,
            Self::ValidationFailed { .. } => messages::CREATE_TEMPLATE_DEPLOYMENT_VALIDATION_FAILED,
            Self::DeploymentFailed { .. } => messages::CREATE_TEMPLATE_DEPLOYMENT_FAILED,
            Self::InvalidTemplateLocation { .. } => messages::INVALID_TEMPLATE_LOCATION,
            Self::Configuration { .. } => messages::INVALID_TASK_CONFIGURATION,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeploymentTaskError>;
