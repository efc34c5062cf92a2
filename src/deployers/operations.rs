//! Shared submission sequence: choose dry-run validation or a real
//! deployment, retry the transient not-found gap when a budget is supplied,
//! and publish outputs on success.

use std::sync::OnceLock;
use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use crate::arm::{ArmClient, ScopeTarget};
use crate::config::{RetryConfig, TaskParameters};
use crate::constants::{DEPLOYMENT_MODE_INCREMENTAL, DEPLOYMENT_MODE_VALIDATION, DEPLOYMENT_NAME_PREFIX, PROPERTY_MODE};
use crate::error::{DeploymentTaskError, Result};
use crate::logging::{log_deployment_errors, log_deployment_operation};
use crate::messages;
use crate::outputs::{propagate_outputs, OutputSink};
use crate::parameters::DeploymentParameters;
use crate::state::DeploymentRunState;

/// Generate a run-unique deployment name when none was configured.
pub(crate) fn generate_deployment_name() -> String {
    format!(
        "{}-{}",
        DEPLOYMENT_NAME_PREFIX,
        Utc::now().format("%Y%m%d-%H%M%S")
    )
}

/// The deployment name for this run: the configured one, or a name generated
/// at most once and reused across every retry of the same logical deployment.
pub(crate) fn deployment_name<'a>(
    memo: &'a OnceLock<String>,
    task_parameters: &TaskParameters,
) -> &'a str {
    memo.get_or_init(|| {
        task_parameters
            .deployment_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(generate_deployment_name)
    })
    .as_str()
}

/// One deployment submission, bundled so every scope drives the same sequence.
pub(crate) struct Submission<'a> {
    pub client: &'a dyn ArmClient,
    pub outputs: &'a dyn OutputSink,
    pub task_parameters: &'a TaskParameters,
    pub target: ScopeTarget,
    pub deployment_name: &'a str,
    /// Budget for the transient not-found loop. Only the resource-group
    /// deployer supplies one; the other scopes submit exactly once.
    pub retry: Option<&'a RetryConfig>,
}

/// Submit the deployment (or its dry run) and drive the run to a terminal
/// state.
pub(crate) async fn perform_deployment(
    submission: Submission<'_>,
    parameters: &mut DeploymentParameters,
    state: &mut DeploymentRunState,
) -> Result<()> {
    if parameters.mode() == Some(DEPLOYMENT_MODE_VALIDATION) {
        validate_deployment(&submission, parameters, state).await
    } else {
        deploy_template(&submission, parameters, state).await
    }
}

/// Dry-run branch: the wire call always goes out in incremental mode, and a
/// semantic error inside a successful response still fails the run.
async fn validate_deployment(
    submission: &Submission<'_>,
    parameters: &mut DeploymentParameters,
    state: &mut DeploymentRunState,
) -> Result<()> {
    parameters.properties.insert(
        PROPERTY_MODE.to_string(),
        serde_json::Value::String(DEPLOYMENT_MODE_INCREMENTAL.to_string()),
    );

    *state = DeploymentRunState::Validating;
    log_deployment_operation(
        messages::STARTING_VALIDATION,
        Some(submission.deployment_name),
        None,
        "started",
        None,
    );

    let result = match submission
        .client
        .validate(&submission.target, submission.deployment_name, parameters)
        .await
    {
        Ok(result) => result,
        Err(error) => {
            log_deployment_errors(&error);
            *state = DeploymentRunState::Failed;
            return Err(DeploymentTaskError::validation_failed(error));
        }
    };

    if let Some(error) = result.error {
        log_deployment_errors(&error);
        *state = DeploymentRunState::Failed;
        return Err(DeploymentTaskError::deployment_failed(
            submission.deployment_name,
            error,
        ));
    }

    *state = DeploymentRunState::Succeeded;
    log_deployment_operation(
        messages::COMPLETED_VALIDATION,
        Some(submission.deployment_name),
        None,
        "succeeded",
        None,
    );
    Ok(())
}

/// Deploy branch with the bounded transient-retry loop.
async fn deploy_template(
    submission: &Submission<'_>,
    parameters: &mut DeploymentParameters,
    state: &mut DeploymentRunState,
) -> Result<()> {
    let mut attempts_left = submission.retry.map_or(0, |retry| retry.attempts);

    loop {
        *state = DeploymentRunState::Deploying;
        log_deployment_operation(
            messages::STARTING_DEPLOYMENT,
            Some(submission.deployment_name),
            None,
            "started",
            None,
        );

        match submission
            .client
            .create_or_update(&submission.target, submission.deployment_name, parameters)
            .await
        {
            Ok(deployment) => {
                propagate_outputs(submission.outputs, submission.task_parameters, &deployment);
                *state = DeploymentRunState::Succeeded;
                log_deployment_operation(
                    messages::CREATE_TEMPLATE_DEPLOYMENT_SUCCEEDED,
                    Some(submission.deployment_name),
                    None,
                    "succeeded",
                    None,
                );
                return Ok(());
            }
            Err(error) if error.is_resource_group_not_found() && attempts_left > 0 => {
                // Read-after-write gap: the group was created moments ago and
                // is not yet visible to the deployment API. Same name, same
                // parameters on the next attempt.
                attempts_left -= 1;
                let delay = submission.retry.map_or(Duration::ZERO, |retry| retry.delay);
                warn!(
                    operation = messages::RETRYING_DEPLOYMENT,
                    deployment_name = %submission.deployment_name,
                    attempts_left,
                    delay_ms = delay.as_millis() as u64,
                    "⏳ Resource group not yet visible, retrying deployment"
                );
                *state = DeploymentRunState::WaitingRetry;
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                log_deployment_errors(&error);
                *state = DeploymentRunState::Failed;
                return Err(DeploymentTaskError::deployment_failed(
                    submission.deployment_name,
                    error,
                ));
            }
        }
    }
}
