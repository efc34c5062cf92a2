//! Wire types exchanged with the cloud control plane.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::RESOURCE_GROUP_NOT_FOUND_CODE;

/// Error payload returned by the control plane.
///
/// The same shape appears in two places: as the error of a failed call, and
/// nested inside an otherwise-200 validate response when the template fails
/// semantic validation (see [`ValidationResult`]).
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct ArmError {
    pub code: String,
    pub message: String,

    /// Per-resource sub-errors accompanying a deployment failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ArmError>>,

    /// Nested error object some provider responses wrap the cause in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Box<ArmError>>,
}

impl ArmError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            error: None,
        }
    }

    /// Whether this is the transient consistency error worth retrying:
    /// a just-created resource group that the deployment API cannot see yet.
    pub fn is_resource_group_not_found(&self) -> bool {
        self.code == RESOURCE_GROUP_NOT_FOUND_CODE
    }
}

/// A resource group as returned by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub name: String,
    pub location: String,
}

/// Result of a completed deployment submission, after the underlying
/// long-running operation has been polled to a terminal state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentExtended {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<DeploymentPropertiesExtended>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPropertiesExtended {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    /// Template outputs, keyed by output name. Propagated to the caller when
    /// an output variable was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
}

/// Body of a 200-class validate response.
///
/// A populated `error` means the template failed semantic validation even
/// though the call itself succeeded; callers must treat it as a failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ArmError>,
}

/// Routing for a deployment submission: the level of the resource hierarchy
/// the deployment is applied at.
///
/// Subscription and management-group ids are carried by the client's
/// connection, like credentials; only the resource-group name varies per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTarget {
    ResourceGroup { resource_group: String },
    Subscription,
    ManagementGroup,
}
