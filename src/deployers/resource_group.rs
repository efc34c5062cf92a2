//! # Resource Group Deployer
//!
//! The only scope that manages the target container itself: the named
//! resource group is created when absent, and the submission retries the
//! consistency gap between that creation and deployment-API visibility.

use std::sync::OnceLock;

use async_trait::async_trait;

use super::operations::{self, Submission};
use super::{Deploy, DeployerContext};
use crate::arm::ScopeTarget;
use crate::error::{DeploymentTaskError, Result};
use crate::logging::{log_deployment_errors, log_deployment_operation, log_resource_group_operation};
use crate::messages;
use crate::state::DeploymentRunState;
use crate::template;

pub struct ResourceGroupDeployer {
    context: DeployerContext,
    deployment_name: OnceLock<String>,
    state: DeploymentRunState,
}

impl ResourceGroupDeployer {
    pub fn new(context: DeployerContext) -> Self {
        Self {
            context,
            deployment_name: OnceLock::new(),
            state: DeploymentRunState::NotStarted,
        }
    }

    /// Ensure the target resource group exists, then deploy the template
    /// into it.
    pub async fn create_or_update_resource_group(&mut self) -> Result<()> {
        let result = self.run().await;
        if result.is_err() {
            self.state = DeploymentRunState::Failed;
        }
        result
    }

    /// Delete the target resource group and everything in it.
    pub async fn delete_resource_group(&mut self) -> Result<()> {
        let resource_group = self.context.task_parameters.resource_group_name()?.to_string();

        log_resource_group_operation(
            messages::DELETING_RESOURCE_GROUP,
            &resource_group,
            "started",
            None,
        );
        match self.context.client.delete_resource_group(&resource_group).await {
            Ok(()) => {
                log_resource_group_operation(
                    messages::DELETED_RESOURCE_GROUP,
                    &resource_group,
                    "succeeded",
                    None,
                );
                Ok(())
            }
            Err(error) => {
                log_deployment_errors(&error);
                Err(DeploymentTaskError::could_not_delete_resource_group(
                    resource_group,
                    error,
                ))
            }
        }
    }

    async fn run(&mut self) -> Result<()> {
        let resource_group = self.context.task_parameters.resource_group_name()?.to_string();

        self.state = DeploymentRunState::CheckingExistence;
        log_resource_group_operation(
            messages::CHECKING_RESOURCE_GROUP_STATUS,
            &resource_group,
            "started",
            None,
        );
        let exists = match self.context.client.check_existence(&resource_group).await {
            Ok(exists) => exists,
            Err(error) => {
                log_deployment_errors(&error);
                return Err(DeploymentTaskError::resource_group_status_fetch_failed(error));
            }
        };

        if !exists {
            self.create_resource_group(&resource_group).await?;
        }

        log_deployment_operation(
            messages::CREATING_TEMPLATE_DEPLOYMENT,
            None,
            Some(&resource_group),
            "started",
            None,
        );
        let mut parameters = template::resolve_deployment_parameters(
            self.context.resolver.as_ref(),
            &self.context.task_parameters,
        )
        .await?;
        parameters.update_common_properties(self.context.task_parameters.mode);

        let DeployerContext {
            client,
            outputs,
            task_parameters,
            retry,
            ..
        } = &self.context;
        let submission = Submission {
            client: client.as_ref(),
            outputs: outputs.as_ref(),
            task_parameters,
            target: ScopeTarget::ResourceGroup {
                resource_group: resource_group.clone(),
            },
            deployment_name: operations::deployment_name(&self.deployment_name, task_parameters),
            retry: Some(retry),
        };
        operations::perform_deployment(submission, &mut parameters, &mut self.state).await
    }

    async fn create_resource_group(&mut self, resource_group: &str) -> Result<()> {
        self.state = DeploymentRunState::CreatingResourceGroup;
        let location = self
            .context
            .task_parameters
            .location
            .as_deref()
            .filter(|location| !location.is_empty())
            .ok_or_else(|| {
                DeploymentTaskError::configuration(
                    "location is required to create the resource group",
                )
            })?;

        log_resource_group_operation(
            messages::CREATING_RESOURCE_GROUP,
            resource_group,
            "started",
            Some(location),
        );
        match self
            .context
            .client
            .create_resource_group(resource_group, location)
            .await
        {
            Ok(_) => {
                log_resource_group_operation(
                    messages::CREATED_RESOURCE_GROUP,
                    resource_group,
                    "succeeded",
                    None,
                );
                Ok(())
            }
            Err(error) => {
                log_deployment_errors(&error);
                Err(DeploymentTaskError::resource_group_creation_failed(
                    resource_group,
                    error,
                ))
            }
        }
    }
}

#[async_trait]
impl Deploy for ResourceGroupDeployer {
    async fn deploy(&mut self) -> Result<()> {
        self.create_or_update_resource_group().await
    }

    fn state(&self) -> DeploymentRunState {
        self.state
    }
}
