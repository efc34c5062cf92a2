//! # Output Propagation
//!
//! Deployment outputs flow back to the caller as a single named run-scoped
//! variable holding the JSON-serialized `properties.outputs` object.

use tracing::info;

use crate::arm::DeploymentExtended;
use crate::config::TaskParameters;
use crate::messages;

/// Run-scoped variable store provided by the host task.
pub trait OutputSink: Send + Sync {
    /// Set a named variable for the remainder of the run.
    fn set_variable(&self, name: &str, value: &str);
}

/// Publish `properties.outputs` under the configured variable name.
///
/// Nothing is set when the response carries no outputs (absent, null, or an
/// empty object) or when no variable name was configured; otherwise the
/// variable is set exactly once per run.
pub(crate) fn propagate_outputs(
    sink: &dyn OutputSink,
    task_parameters: &TaskParameters,
    deployment: &DeploymentExtended,
) {
    let Some(variable) = task_parameters
        .deployment_outputs
        .as_deref()
        .filter(|name| !name.is_empty())
    else {
        return;
    };
    let Some(outputs) = deployment
        .properties
        .as_ref()
        .and_then(|properties| properties.outputs.as_ref())
    else {
        return;
    };
    if outputs.is_null() || outputs.as_object().is_some_and(|map| map.is_empty()) {
        return;
    }

    if let Ok(serialized) = serde_json::to_string(outputs) {
        sink.set_variable(variable, &serialized);
        info!(
            operation = messages::ADDED_OUTPUT_VARIABLE,
            variable = %variable,
            "📤 Deployment outputs published"
        );
    }
}
