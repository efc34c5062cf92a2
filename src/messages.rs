//! # Message Catalog
//!
//! Opaque message identifiers mirroring the localization keys of the host
//! pipeline task. Progress events attach a key as the structured `operation`
//! field; failure variants report theirs through
//! [`crate::error::DeploymentTaskError::message_key`], so the host can map a
//! run's outcome back to its localized catalog.

pub const CHECKING_RESOURCE_GROUP_STATUS: &str = "CheckingResourceGroupStatus";
pub const RESOURCE_GROUP_STATUS_FETCH_FAILED: &str = "ResourceGroupStatusFetchFailed";
pub const CREATING_RESOURCE_GROUP: &str = "CreatingResourceGroup";
pub const CREATED_RESOURCE_GROUP: &str = "CreatedResourceGroup";
pub const RESOURCE_GROUP_CREATION_FAILED: &str = "ResourceGroupCreationFailed";
pub const DELETING_RESOURCE_GROUP: &str = "DeletingResourceGroup";
pub const DELETED_RESOURCE_GROUP: &str = "DeletedResourceGroup";
pub const COULD_NOT_DELETE_RESOURCE_GROUP: &str = "CouldNotDeleteResourceGroup";

pub const CREATING_TEMPLATE_DEPLOYMENT: &str = "CreatingTemplateDeployment";
pub const STARTING_DEPLOYMENT: &str = "StartingDeployment";
pub const STARTING_VALIDATION: &str = "StartingValidation";
pub const COMPLETED_VALIDATION: &str = "CompletedValidation";
pub const RETRYING_DEPLOYMENT: &str = "RetryingDeployment";
pub const CREATE_TEMPLATE_DEPLOYMENT_SUCCEEDED: &str = "CreateTemplateDeploymentSucceeded";
pub const CREATE_TEMPLATE_DEPLOYMENT_FAILED: &str = "CreateTemplateDeploymentFailed";
pub const CREATE_TEMPLATE_DEPLOYMENT_VALIDATION_FAILED: &str =
    "CreateTemplateDeploymentValidationFailed";

pub const INVALID_TEMPLATE_LOCATION: &str = "InvalidTemplateLocation";
pub const INVALID_TASK_CONFIGURATION: &str = "InvalidTaskConfiguration";
pub const ADDED_OUTPUT_VARIABLE: &str = "AddedOutputVariable";
