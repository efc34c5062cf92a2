//! # Deployment Parameters
//!
//! Value object holding the resolved template payload handed to the control
//! plane. One instance is created per run from the resolved template, stamped
//! with the deployment mode (and, above resource-group scope, the target
//! location), passed by reference through every retry attempt, and discarded
//! when the run reaches a terminal state.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::DeploymentMode;
use crate::constants::{
    DEBUG_SETTING_DETAIL_LEVEL, PROPERTY_DEBUG_SETTING, PROPERTY_DETAIL_LEVEL, PROPERTY_MODE,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentParameters {
    /// Template payload: template body or link, parameter values, and once
    /// stamped, the deployment mode and debug setting.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Target location. Set only for subscription and management-group
    /// deployments; a resource-group deployment omits it because the target
    /// group already carries a location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl DeploymentParameters {
    pub fn new(properties: Map<String, Value>) -> Self {
        Self {
            properties,
            location: None,
        }
    }

    /// Stamp the deployment mode and the fixed debug setting.
    ///
    /// Called once per run, immediately before the first submission attempt.
    /// Retries reuse the stamped instance unchanged; the only later mutation
    /// is the incremental override a dry run puts on the wire.
    pub fn update_common_properties(&mut self, mode: DeploymentMode) {
        self.properties.insert(
            PROPERTY_MODE.to_string(),
            Value::String(mode.wire_value().to_string()),
        );
        self.properties.insert(
            PROPERTY_DEBUG_SETTING.to_string(),
            json!({ PROPERTY_DETAIL_LEVEL: DEBUG_SETTING_DETAIL_LEVEL }),
        );
    }

    /// Set the target location. Called once for subscription and
    /// management-group scopes.
    pub fn update_location(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }

    /// Current wire value of `properties.mode`, if stamped.
    pub fn mode(&self) -> Option<&str> {
        self.properties.get(PROPERTY_MODE).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEPLOYMENT_MODE_INCREMENTAL;

    fn template_parameters() -> DeploymentParameters {
        let mut properties = Map::new();
        properties.insert("template".to_string(), json!({ "resources": [] }));
        DeploymentParameters::new(properties)
    }

    #[test]
    fn mode_is_unset_until_stamped() {
        assert_eq!(template_parameters().mode(), None);
    }

    #[test]
    fn stamping_sets_mode_and_debug_setting() {
        let mut parameters = template_parameters();
        parameters.update_common_properties(DeploymentMode::Incremental);

        assert_eq!(parameters.mode(), Some(DEPLOYMENT_MODE_INCREMENTAL));
        assert_eq!(
            parameters.properties[PROPERTY_DEBUG_SETTING][PROPERTY_DETAIL_LEVEL],
            json!(DEBUG_SETTING_DETAIL_LEVEL)
        );
        // the resolved template survives the stamp
        assert!(parameters.properties.contains_key("template"));
    }

    #[test]
    fn location_is_absent_until_set() {
        let mut parameters = template_parameters();
        assert_eq!(parameters.location, None);

        parameters.update_location("eastus2");
        assert_eq!(parameters.location.as_deref(), Some("eastus2"));
    }
}
