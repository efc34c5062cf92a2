//! # Template Resolution Port
//!
//! The template body is resolved outside this core, from a linked pipeline
//! artifact or from a public URL. This port abstracts that collaborator; the
//! deployers dispatch on the configured [`TemplateLocation`].

use async_trait::async_trait;

use crate::config::{TaskParameters, TemplateLocation};
use crate::error::Result;
use crate::parameters::DeploymentParameters;

/// Resolves the template payload into submission-ready
/// [`DeploymentParameters`].
#[async_trait]
pub trait TemplateResolver: Send + Sync {
    /// Resolve from a linked pipeline artifact. Synchronous: the artifact is
    /// already on disk when the task runs.
    fn resolve_linked_artifact(&self, parameters: &TaskParameters) -> Result<DeploymentParameters>;

    /// Resolve from a public URL. Asynchronous: the template (and any
    /// parameter override file) is fetched at run time.
    async fn resolve_public_url(&self, parameters: &TaskParameters)
        -> Result<DeploymentParameters>;
}

/// Dispatch to the configured template source.
pub(crate) async fn resolve_deployment_parameters(
    resolver: &dyn TemplateResolver,
    parameters: &TaskParameters,
) -> Result<DeploymentParameters> {
    match parameters.template_location {
        TemplateLocation::LinkedArtifact => resolver.resolve_linked_artifact(parameters),
        TemplateLocation::PublicUrl => resolver.resolve_public_url(parameters).await,
    }
}
