//! Integration tests for the scope deployers, driven through scripted mock
//! collaborators: a programmable control-plane client, a static template
//! resolver, and a recording output sink. Retry delays run at millisecond
//! scale so the transient-retry loop is exercised without real waits.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use armdeploy_core::arm::{
    ArmClient, ArmError, ArmResult, DeploymentExtended, DeploymentPropertiesExtended,
    ResourceGroup, ScopeTarget, ValidationResult,
};
use armdeploy_core::deployers::ResourceGroupDeployer;
use armdeploy_core::outputs::OutputSink;
use armdeploy_core::template::TemplateResolver;
use armdeploy_core::{
    Deploy, DeployerContext, DeploymentMode, DeploymentParameters, DeploymentRunState,
    DeploymentScope, DeploymentTaskError, RetryConfig, ScopeDeployer, TaskParameters,
    TemplateLocation,
};

/// Control-plane mock with a programmable failure script and an ordered call
/// log.
#[derive(Default)]
struct MockArmClient {
    exists: bool,
    existence_error: Option<ArmError>,
    create_error: Option<ArmError>,
    delete_error: Option<ArmError>,
    /// Fail this many submissions with `ResourceGroupNotFound` before
    /// succeeding (or before `deploy_error` takes over).
    not_found_failures: AtomicU32,
    deploy_error: Option<ArmError>,
    validate_transport_error: Option<ArmError>,
    /// Semantic error carried inside a 200-class validate response.
    validation_error: Option<ArmError>,
    outputs: Option<Value>,
    calls: Mutex<Vec<String>>,
    deployment_names: Mutex<Vec<String>>,
    submitted_locations: Mutex<Vec<Option<String>>>,
}

impl MockArmClient {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn deployment_names(&self) -> Vec<String> {
        self.deployment_names.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArmClient for MockArmClient {
    async fn check_existence(&self, resource_group: &str) -> ArmResult<bool> {
        self.record(format!("check:{resource_group}"));
        match &self.existence_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.exists),
        }
    }

    async fn create_resource_group(
        &self,
        resource_group: &str,
        location: &str,
    ) -> ArmResult<ResourceGroup> {
        self.record(format!("create:{resource_group}"));
        match &self.create_error {
            Some(error) => Err(error.clone()),
            None => Ok(ResourceGroup {
                name: resource_group.to_string(),
                location: location.to_string(),
            }),
        }
    }

    async fn delete_resource_group(&self, resource_group: &str) -> ArmResult<()> {
        self.record(format!("delete:{resource_group}"));
        match &self.delete_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn validate(
        &self,
        _target: &ScopeTarget,
        deployment_name: &str,
        _parameters: &DeploymentParameters,
    ) -> ArmResult<ValidationResult> {
        self.record("validate");
        self.deployment_names
            .lock()
            .unwrap()
            .push(deployment_name.to_string());
        if let Some(error) = &self.validate_transport_error {
            return Err(error.clone());
        }
        Ok(ValidationResult {
            error: self.validation_error.clone(),
        })
    }

    async fn create_or_update(
        &self,
        _target: &ScopeTarget,
        deployment_name: &str,
        parameters: &DeploymentParameters,
    ) -> ArmResult<DeploymentExtended> {
        self.record("deploy");
        self.deployment_names
            .lock()
            .unwrap()
            .push(deployment_name.to_string());
        self.submitted_locations
            .lock()
            .unwrap()
            .push(parameters.location.clone());

        if self
            .not_found_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok()
        {
            return Err(ArmError::new(
                "ResourceGroupNotFound",
                "Resource group 'demo-rg' could not be found.",
            ));
        }
        if let Some(error) = &self.deploy_error {
            return Err(error.clone());
        }
        Ok(DeploymentExtended {
            properties: Some(DeploymentPropertiesExtended {
                provisioning_state: Some("Succeeded".to_string()),
                outputs: self.outputs.clone(),
            }),
        })
    }
}

struct StaticTemplateResolver;

#[async_trait]
impl TemplateResolver for StaticTemplateResolver {
    fn resolve_linked_artifact(
        &self,
        _parameters: &TaskParameters,
    ) -> armdeploy_core::Result<DeploymentParameters> {
        let mut properties = Map::new();
        properties.insert("template".to_string(), json!({ "resources": [] }));
        Ok(DeploymentParameters::new(properties))
    }

    async fn resolve_public_url(
        &self,
        parameters: &TaskParameters,
    ) -> armdeploy_core::Result<DeploymentParameters> {
        self.resolve_linked_artifact(parameters)
    }
}

#[derive(Default)]
struct RecordingSink {
    variables: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn variables(&self) -> Vec<(String, String)> {
        self.variables.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn set_variable(&self, name: &str, value: &str) {
        self.variables
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
    }
}

fn resource_group_parameters() -> TaskParameters {
    TaskParameters {
        scope: DeploymentScope::ResourceGroup,
        resource_group_name: Some("demo-rg".to_string()),
        location: Some("westus2".to_string()),
        deployment_name: None,
        deployment_outputs: None,
        template_location: TemplateLocation::LinkedArtifact,
        mode: DeploymentMode::Incremental,
    }
}

fn subscription_parameters() -> TaskParameters {
    TaskParameters {
        scope: DeploymentScope::Subscription,
        resource_group_name: None,
        location: Some("westus2".to_string()),
        deployment_name: None,
        deployment_outputs: None,
        template_location: TemplateLocation::LinkedArtifact,
        mode: DeploymentMode::Incremental,
    }
}

fn management_group_parameters() -> TaskParameters {
    TaskParameters {
        scope: DeploymentScope::ManagementGroup,
        ..subscription_parameters()
    }
}

fn context(
    client: Arc<MockArmClient>,
    sink: Arc<RecordingSink>,
    task_parameters: TaskParameters,
) -> DeployerContext {
    DeployerContext {
        client,
        resolver: Arc::new(StaticTemplateResolver),
        outputs: sink,
        task_parameters,
        retry: RetryConfig {
            attempts: 3,
            delay: Duration::from_millis(1),
        },
    }
}

async fn run(client: Arc<MockArmClient>, task_parameters: TaskParameters) -> (ScopeDeployer, armdeploy_core::Result<()>) {
    let sink = Arc::new(RecordingSink::default());
    let mut deployer =
        ScopeDeployer::from_context(context(client, sink, task_parameters)).unwrap();
    let result = deployer.deploy().await;
    (deployer, result)
}

#[tokio::test]
async fn existing_resource_group_is_not_recreated() {
    let client = Arc::new(MockArmClient {
        exists: true,
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert!(result.is_ok());
    assert_eq!(deployer.state(), DeploymentRunState::Succeeded);
    assert_eq!(client.count("check"), 1);
    assert_eq!(client.count("create"), 0);
    assert_eq!(client.count("deploy"), 1);
}

#[tokio::test]
async fn absent_resource_group_is_created_before_the_deployment() {
    let client = Arc::new(MockArmClient::default());

    let (_, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert!(result.is_ok());
    assert_eq!(
        client.calls(),
        vec!["check:demo-rg", "create:demo-rg", "deploy"]
    );
}

#[tokio::test]
async fn generated_deployment_name_is_stable_across_retries() {
    let client = Arc::new(MockArmClient {
        not_found_failures: AtomicU32::new(2),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert!(result.is_ok());
    assert_eq!(deployer.state(), DeploymentRunState::Succeeded);
    let names = client.deployment_names();
    assert_eq!(names.len(), 3);
    assert!(names[0].starts_with("azuredeploy-"));
    assert!(names.iter().all(|name| name == &names[0]));
}

#[tokio::test]
async fn configured_deployment_name_is_used_verbatim() {
    let client = Arc::new(MockArmClient::default());
    let mut task_parameters = resource_group_parameters();
    task_parameters.deployment_name = Some("nightly-deploy".to_string());

    let (_, result) = run(Arc::clone(&client), task_parameters).await;

    assert!(result.is_ok());
    assert_eq!(client.deployment_names(), vec!["nightly-deploy"]);
}

#[tokio::test]
async fn retry_budget_bounds_the_submission_count() {
    let client = Arc::new(MockArmClient {
        not_found_failures: AtomicU32::new(u32::MAX),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    // 1 initial attempt + 3 retries, then the generic deployment failure.
    assert_eq!(client.count("deploy"), 4);
    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    let error = result.unwrap_err();
    assert!(matches!(
        error,
        DeploymentTaskError::DeploymentFailed { .. }
    ));
    assert_eq!(error.message_key(), "CreateTemplateDeploymentFailed");
}

#[tokio::test]
async fn run_recovers_when_a_retry_succeeds_within_budget() {
    let client = Arc::new(MockArmClient {
        not_found_failures: AtomicU32::new(2),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert!(result.is_ok());
    assert_eq!(deployer.state(), DeploymentRunState::Succeeded);
    assert_eq!(client.count("deploy"), 3);
}

#[tokio::test]
async fn non_transient_deploy_errors_are_not_retried() {
    let client = Arc::new(MockArmClient {
        deploy_error: Some(ArmError::new("InvalidTemplate", "unparseable template")),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert_eq!(client.count("deploy"), 1);
    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::DeploymentFailed { .. }
    ));
}

#[tokio::test]
async fn validation_mode_never_submits_a_real_deployment() {
    let client = Arc::new(MockArmClient {
        exists: true,
        ..MockArmClient::default()
    });
    let mut task_parameters = resource_group_parameters();
    task_parameters.mode = DeploymentMode::Validation;

    let (deployer, result) = run(Arc::clone(&client), task_parameters).await;

    assert!(result.is_ok());
    assert_eq!(deployer.state(), DeploymentRunState::Succeeded);
    assert_eq!(client.count("validate"), 1);
    assert_eq!(client.count("deploy"), 0);
}

#[tokio::test]
async fn semantic_error_in_successful_validate_response_fails_the_run() {
    let client = Arc::new(MockArmClient {
        exists: true,
        validation_error: Some(ArmError::new(
            "InvalidTemplateDeployment",
            "The template deployment failed validation.",
        )),
        ..MockArmClient::default()
    });
    let mut task_parameters = resource_group_parameters();
    task_parameters.mode = DeploymentMode::Validation;

    let (deployer, result) = run(Arc::clone(&client), task_parameters).await;

    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert_eq!(client.count("deploy"), 0);
    let error = result.unwrap_err();
    assert!(matches!(
        error,
        DeploymentTaskError::DeploymentFailed { .. }
    ));
    assert_eq!(error.message_key(), "CreateTemplateDeploymentFailed");
}

#[tokio::test]
async fn validate_transport_failure_is_a_validation_error() {
    let client = Arc::new(MockArmClient {
        exists: true,
        validate_transport_error: Some(ArmError::new("GatewayTimeout", "timed out")),
        ..MockArmClient::default()
    });
    let mut task_parameters = resource_group_parameters();
    task_parameters.mode = DeploymentMode::Validation;

    let (deployer, result) = run(Arc::clone(&client), task_parameters).await;

    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::ValidationFailed { .. }
    ));
}

#[tokio::test]
async fn outputs_are_published_under_the_configured_variable() {
    let outputs = json!({ "endpoint": { "type": "String", "value": "https://example.net" } });
    let client = Arc::new(MockArmClient {
        exists: true,
        outputs: Some(outputs.clone()),
        ..MockArmClient::default()
    });
    let sink = Arc::new(RecordingSink::default());
    let mut task_parameters = resource_group_parameters();
    task_parameters.deployment_outputs = Some("armOutputs".to_string());

    let mut deployer = ScopeDeployer::from_context(context(
        Arc::clone(&client),
        Arc::clone(&sink),
        task_parameters,
    ))
    .unwrap();
    deployer.deploy().await.unwrap();

    let variables = sink.variables();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].0, "armOutputs");
    let published: Value = serde_json::from_str(&variables[0].1).unwrap();
    assert_eq!(published, outputs);
}

#[tokio::test]
async fn no_variable_is_set_without_outputs_or_without_a_name() {
    // outputs present, no variable configured
    let client = Arc::new(MockArmClient {
        exists: true,
        outputs: Some(json!({ "endpoint": "x" })),
        ..MockArmClient::default()
    });
    let sink = Arc::new(RecordingSink::default());
    let mut deployer = ScopeDeployer::from_context(context(
        client,
        Arc::clone(&sink),
        resource_group_parameters(),
    ))
    .unwrap();
    deployer.deploy().await.unwrap();
    assert!(sink.variables().is_empty());

    // variable configured, empty outputs
    let client = Arc::new(MockArmClient {
        exists: true,
        outputs: Some(json!({})),
        ..MockArmClient::default()
    });
    let sink = Arc::new(RecordingSink::default());
    let mut task_parameters = resource_group_parameters();
    task_parameters.deployment_outputs = Some("armOutputs".to_string());
    let mut deployer =
        ScopeDeployer::from_context(context(client, Arc::clone(&sink), task_parameters)).unwrap();
    deployer.deploy().await.unwrap();
    assert!(sink.variables().is_empty());
}

#[tokio::test]
async fn resource_group_deployments_omit_the_location() {
    let client = Arc::new(MockArmClient {
        exists: true,
        ..MockArmClient::default()
    });

    let (_, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert!(result.is_ok());
    assert_eq!(*client.submitted_locations.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn subscription_deployments_carry_the_location_and_never_retry() {
    let client = Arc::new(MockArmClient {
        not_found_failures: AtomicU32::new(5),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), subscription_parameters()).await;

    assert_eq!(client.count("deploy"), 1);
    assert_eq!(client.count("check"), 0);
    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::DeploymentFailed { .. }
    ));
    assert_eq!(
        *client.submitted_locations.lock().unwrap(),
        vec![Some("westus2".to_string())]
    );
}

#[tokio::test]
async fn management_group_deployments_never_retry() {
    let client = Arc::new(MockArmClient {
        not_found_failures: AtomicU32::new(5),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), management_group_parameters()).await;

    assert_eq!(client.count("deploy"), 1);
    assert_eq!(client.count("check"), 0);
    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert!(result.is_err());
}

#[tokio::test]
async fn failed_existence_probe_stops_the_run_immediately() {
    let client = Arc::new(MockArmClient {
        existence_error: Some(ArmError::new("AuthorizationFailed", "no permission")),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert_eq!(client.count("create"), 0);
    assert_eq!(client.count("deploy"), 0);
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::ResourceGroupStatusFetchFailed { .. }
    ));
}

#[tokio::test]
async fn failed_creation_stops_the_run_before_any_submission() {
    let client = Arc::new(MockArmClient {
        create_error: Some(ArmError::new("QuotaExceeded", "too many resource groups")),
        ..MockArmClient::default()
    });

    let (deployer, result) = run(Arc::clone(&client), resource_group_parameters()).await;

    assert_eq!(deployer.state(), DeploymentRunState::Failed);
    assert_eq!(client.count("deploy"), 0);
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::ResourceGroupCreationFailed { .. }
    ));
}

#[tokio::test]
async fn missing_location_fails_creation_but_not_existing_groups() {
    let mut task_parameters = resource_group_parameters();
    task_parameters.location = None;

    // group exists: no location needed
    let client = Arc::new(MockArmClient {
        exists: true,
        ..MockArmClient::default()
    });
    let (_, result) = run(Arc::clone(&client), task_parameters.clone()).await;
    assert!(result.is_ok());

    // group absent: creation demands a location
    let client = Arc::new(MockArmClient::default());
    let (_, result) = run(Arc::clone(&client), task_parameters).await;
    assert!(matches!(
        result.unwrap_err(),
        DeploymentTaskError::Configuration { .. }
    ));
    assert_eq!(client.count("create"), 0);
}

#[tokio::test]
async fn misconfigured_scope_is_rejected_before_any_call() {
    let client = Arc::new(MockArmClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut task_parameters = subscription_parameters();
    task_parameters.location = None;

    let result = ScopeDeployer::from_context(context(Arc::clone(&client), sink, task_parameters));

    assert!(matches!(
        result.err().unwrap(),
        DeploymentTaskError::Configuration { .. }
    ));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn delete_resource_group_logs_and_wraps_failures() {
    let client = Arc::new(MockArmClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut deployer = ResourceGroupDeployer::new(context(
        Arc::clone(&client),
        Arc::clone(&sink),
        resource_group_parameters(),
    ));
    deployer.delete_resource_group().await.unwrap();
    assert_eq!(client.calls(), vec!["delete:demo-rg"]);

    let failing = Arc::new(MockArmClient {
        delete_error: Some(ArmError::new("InUse", "resource group is locked")),
        ..MockArmClient::default()
    });
    let mut deployer =
        ResourceGroupDeployer::new(context(failing, sink, resource_group_parameters()));
    assert!(matches!(
        deployer.delete_resource_group().await.unwrap_err(),
        DeploymentTaskError::CouldNotDeleteResourceGroup { .. }
    ));
}
