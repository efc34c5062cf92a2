//! # Task Parameters and Configuration
//!
//! Externally supplied, read-only inputs of a deployment run, plus the
//! injectable retry configuration. Parameters arrive from the host task as a
//! single serde-deserializable struct; [`TaskParameters::validate`] enforces
//! the cross-field requirements before any network call is made.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DEPLOYMENT_MODE_INCREMENTAL,
    DEPLOYMENT_MODE_VALIDATION,
};
use crate::error::{DeploymentTaskError, Result};

/// Level of the resource hierarchy a deployment is applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentScope {
    #[serde(rename = "Resource Group")]
    ResourceGroup,
    #[serde(rename = "Subscription")]
    Subscription,
    #[serde(rename = "Management Group")]
    ManagementGroup,
}

impl fmt::Display for DeploymentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceGroup => write!(f, "Resource Group"),
            Self::Subscription => write!(f, "Subscription"),
            Self::ManagementGroup => write!(f, "Management Group"),
        }
    }
}

impl FromStr for DeploymentScope {
    type Err = DeploymentTaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Resource Group" => Ok(Self::ResourceGroup),
            "Subscription" => Ok(Self::Subscription),
            "Management Group" => Ok(Self::ManagementGroup),
            other => Err(DeploymentTaskError::configuration(format!(
                "unknown deployment scope: {other}"
            ))),
        }
    }
}

/// Where the template body is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateLocation {
    /// A file published by an earlier pipeline stage, already on disk.
    #[serde(rename = "Linked artifact")]
    LinkedArtifact,
    /// A publicly reachable URL, fetched at run time.
    #[serde(rename = "URL of the file")]
    PublicUrl,
}

impl fmt::Display for TemplateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkedArtifact => write!(f, "Linked artifact"),
            Self::PublicUrl => write!(f, "URL of the file"),
        }
    }
}

impl FromStr for TemplateLocation {
    type Err = DeploymentTaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Linked artifact" => Ok(Self::LinkedArtifact),
            "URL of the file" => Ok(Self::PublicUrl),
            other => Err(DeploymentTaskError::invalid_template_location(other)),
        }
    }
}

/// Deployment mode hint: apply the template, or dry-run it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentMode {
    /// Add or update the template's resources; leave everything else alone.
    #[default]
    Incremental,
    /// Report whether the deployment would succeed, without applying changes.
    Validation,
}

impl DeploymentMode {
    /// Value stamped into `DeploymentParameters.properties.mode`.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Incremental => DEPLOYMENT_MODE_INCREMENTAL,
            Self::Validation => DEPLOYMENT_MODE_VALIDATION,
        }
    }
}

/// Externally supplied inputs of one deployment run. Read-only to this core.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskParameters {
    pub scope: DeploymentScope,

    /// Target resource group. Required iff `scope` is `ResourceGroup`.
    #[serde(default)]
    pub resource_group_name: Option<String>,

    /// Deployment location. Required for subscription and management-group
    /// scopes; at resource-group scope it is only needed when the group must
    /// be created.
    #[serde(default)]
    pub location: Option<String>,

    /// Deployment name. Generated once per run when absent.
    #[serde(default)]
    pub deployment_name: Option<String>,

    /// Name of the run-scoped variable to populate with the deployment
    /// outputs. No variable is set when absent.
    #[serde(default)]
    pub deployment_outputs: Option<String>,

    pub template_location: TemplateLocation,

    #[serde(default)]
    pub mode: DeploymentMode,
}

impl TaskParameters {
    /// Cross-field validation, run before any network call.
    pub fn validate(&self) -> Result<()> {
        match self.scope {
            DeploymentScope::ResourceGroup => {
                self.resource_group_name()?;
            }
            DeploymentScope::Subscription | DeploymentScope::ManagementGroup => {
                self.location()?;
            }
        }
        Ok(())
    }

    /// The configured resource group name, or a configuration error.
    pub fn resource_group_name(&self) -> Result<&str> {
        self.resource_group_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                DeploymentTaskError::configuration(
                    "resourceGroupName is required for resource group scoped deployments",
                )
            })
    }

    /// The configured location, or a configuration error.
    pub fn location(&self) -> Result<&str> {
        self.location
            .as_deref()
            .filter(|location| !location.is_empty())
            .ok_or_else(|| {
                DeploymentTaskError::configuration(format!(
                    "location is required for {} scoped deployments",
                    self.scope
                ))
            })
    }
}

/// Retry budget for the transient not-found gap after resource group
/// creation. Injectable so tests can exercise the loop without real delays.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Resubmissions allowed after the initial attempt.
    pub attempts: u32,

    /// Delay between a transient failure and the next submission.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}
