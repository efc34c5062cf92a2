//! # Deployment Constants
//!
//! Central constants for the deployment orchestration core. Retry behavior is
//! configurable through [`crate::config::RetryConfig`]; the values here are
//! only its defaults.

use std::time::Duration;

/// Error code the control plane returns when a freshly created resource group
/// is not yet visible to the deployment API (read-after-write replication lag).
pub const RESOURCE_GROUP_NOT_FOUND_CODE: &str = "ResourceGroupNotFound";

/// Default number of resubmissions after a transient not-found failure.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay between a transient failure and the next submission attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Detail level stamped into every deployment's debug setting.
pub const DEBUG_SETTING_DETAIL_LEVEL: &str = "requestContent, responseContent";

/// Prefix for deployment names generated when none was configured.
pub const DEPLOYMENT_NAME_PREFIX: &str = "azuredeploy";

/// Wire value for incremental deployment mode.
pub const DEPLOYMENT_MODE_INCREMENTAL: &str = "Incremental";

/// Wire value for the validation-only (dry run) mode.
pub const DEPLOYMENT_MODE_VALIDATION: &str = "Validation";

/// Key of the deployment mode inside `DeploymentParameters.properties`.
pub const PROPERTY_MODE: &str = "mode";

/// Key of the debug setting inside `DeploymentParameters.properties`.
pub const PROPERTY_DEBUG_SETTING: &str = "debugSetting";

/// Key of the detail level inside the debug setting object.
pub const PROPERTY_DETAIL_LEVEL: &str = "detailLevel";
