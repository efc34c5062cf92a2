//! # Scope Deployers
//!
//! One deployer per organizational scope, selected at startup from the
//! configured scope. The three deployers are independent, data-only variants
//! behind a single [`Deploy`] capability rather than specializations of a
//! shared base, which keeps each scope's retry policy an explicit,
//! independently testable property:
//!
//! ```text
//! ┌───────────────┐     ┌──────────────────────────┐
//! │ ScopeDeployer │────▶│ ResourceGroupDeployer    │  ensure group, retry gap
//! │ (on scope)    │────▶│ SubscriptionDeployer     │  single attempt
//! │               │────▶│ ManagementGroupDeployer  │  single attempt
//! └───────────────┘     └──────────────────────────┘
//! ```

mod management_group;
mod operations;
mod resource_group;
mod subscription;

pub use management_group::ManagementGroupDeployer;
pub use resource_group::ResourceGroupDeployer;
pub use subscription::SubscriptionDeployer;

use std::sync::Arc;

use async_trait::async_trait;

use crate::arm::ArmClient;
use crate::config::{DeploymentScope, RetryConfig, TaskParameters};
use crate::error::Result;
use crate::outputs::OutputSink;
use crate::state::DeploymentRunState;
use crate::template::TemplateResolver;

/// Collaborators and configuration shared by every scope deployer.
#[derive(Clone)]
pub struct DeployerContext {
    pub client: Arc<dyn ArmClient>,
    pub resolver: Arc<dyn TemplateResolver>,
    pub outputs: Arc<dyn OutputSink>,
    pub task_parameters: TaskParameters,
    pub retry: RetryConfig,
}

/// Capability implemented by every scope deployer.
#[async_trait]
pub trait Deploy {
    /// Run the deployment to a terminal state.
    async fn deploy(&mut self) -> Result<()>;

    /// State the run last reached.
    fn state(&self) -> DeploymentRunState;
}

/// Tagged union over the three scope deployers, keyed on the configured
/// scope.
pub enum ScopeDeployer {
    ResourceGroup(ResourceGroupDeployer),
    Subscription(SubscriptionDeployer),
    ManagementGroup(ManagementGroupDeployer),
}

impl ScopeDeployer {
    /// Select the deployer for the configured scope.
    ///
    /// Cross-field parameter validation runs here, so misconfiguration fails
    /// before any network call.
    pub fn from_context(context: DeployerContext) -> Result<Self> {
        context.task_parameters.validate()?;
        Ok(match context.task_parameters.scope {
            DeploymentScope::ResourceGroup => {
                Self::ResourceGroup(ResourceGroupDeployer::new(context))
            }
            DeploymentScope::Subscription => {
                Self::Subscription(SubscriptionDeployer::new(context))
            }
            DeploymentScope::ManagementGroup => {
                Self::ManagementGroup(ManagementGroupDeployer::new(context))
            }
        })
    }
}

#[async_trait]
impl Deploy for ScopeDeployer {
    async fn deploy(&mut self) -> Result<()> {
        match self {
            Self::ResourceGroup(deployer) => deployer.deploy().await,
            Self::Subscription(deployer) => deployer.deploy().await,
            Self::ManagementGroup(deployer) => deployer.deploy().await,
        }
    }

    fn state(&self) -> DeploymentRunState {
        match self {
            Self::ResourceGroup(deployer) => deployer.state(),
            Self::Subscription(deployer) => deployer.state(),
            Self::ManagementGroup(deployer) => deployer.state(),
        }
    }
}
