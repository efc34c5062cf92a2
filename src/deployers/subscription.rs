//! # Subscription Deployer
//!
//! Deploys at subscription scope. Subscriptions are not created by this
//! task, so there is no existence check, and the submission is a single
//! attempt: the transient not-found retry applies only to a resource group
//! this task just created.

use std::sync::OnceLock;

use async_trait::async_trait;

use super::operations::{self, Submission};
use super::{Deploy, DeployerContext};
use crate::arm::ScopeTarget;
use crate::error::Result;
use crate::logging::log_deployment_operation;
use crate::messages;
use crate::state::DeploymentRunState;
use crate::template;

pub struct SubscriptionDeployer {
    context: DeployerContext,
    deployment_name: OnceLock<String>,
    state: DeploymentRunState,
}

impl SubscriptionDeployer {
    pub fn new(context: DeployerContext) -> Self {
        Self {
            context,
            deployment_name: OnceLock::new(),
            state: DeploymentRunState::NotStarted,
        }
    }

    async fn run(&mut self) -> Result<()> {
        let location = self.context.task_parameters.location()?.to_string();

        log_deployment_operation(
            messages::CREATING_TEMPLATE_DEPLOYMENT,
            None,
            None,
            "started",
            None,
        );
        let mut parameters = template::resolve_deployment_parameters(
            self.context.resolver.as_ref(),
            &self.context.task_parameters,
        )
        .await?;
        parameters.update_common_properties(self.context.task_parameters.mode);
        parameters.update_location(&location);

        let DeployerContext {
            client,
            outputs,
            task_parameters,
            ..
        } = &self.context;
        let submission = Submission {
            client: client.as_ref(),
            outputs: outputs.as_ref(),
            task_parameters,
            target: ScopeTarget::Subscription,
            deployment_name: operations::deployment_name(&self.deployment_name, task_parameters),
            retry: None,
        };
        operations::perform_deployment(submission, &mut parameters, &mut self.state).await
    }
}

#[async_trait]
impl Deploy for SubscriptionDeployer {
    async fn deploy(&mut self) -> Result<()> {
        let result = self.run().await;
        if result.is_err() {
            self.state = DeploymentRunState::Failed;
        }
        result
    }

    fn state(&self) -> DeploymentRunState {
        self.state
    }
}
