//! # Deployment Run States
//!
//! State definitions for a single deployment run. Exactly one handler runs
//! per invocation, so the state is owned by the handler and observable after
//! the run; there is no persistence and no concurrent transition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// States a deployment run moves through.
///
/// `Succeeded` and `Failed` are terminal. There is no partial or compensating
/// state: a resource group created along the way survives a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentRunState {
    /// Initial state before any control-plane call.
    NotStarted,
    /// Probing whether the target resource group exists.
    CheckingExistence,
    /// Creating the absent target resource group.
    CreatingResourceGroup,
    /// Dry-run validation in flight.
    Validating,
    /// Deployment submission in flight.
    Deploying,
    /// Sleeping out the consistency gap before resubmitting.
    WaitingRetry,
    /// Terminal: the deployment (or validation) completed.
    Succeeded,
    /// Terminal: the run failed; the error surfaced to the caller.
    Failed,
}

impl DeploymentRunState {
    /// Check if this is a terminal state (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Check if the run ended in failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Check if a control-plane call is in flight for this state.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::CheckingExistence
                | Self::CreatingResourceGroup
                | Self::Validating
                | Self::Deploying
        )
    }
}

impl fmt::Display for DeploymentRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::CheckingExistence => write!(f, "checking_existence"),
            Self::CreatingResourceGroup => write!(f, "creating_resource_group"),
            Self::Validating => write!(f, "validating"),
            Self::Deploying => write!(f, "deploying"),
            Self::WaitingRetry => write!(f, "waiting_retry"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
