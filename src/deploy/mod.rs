//! Snippet deployer
//!
//! Resolves a snippet, wraps it in a project creation request and submits it
//! to the project API with the caller's credential. The result is either a
//! landing outcome (nothing to deploy, or nobody to deploy as) or the name of
//! the freshly created project.

mod error;
pub mod project;
mod request;
pub mod slug;
pub mod snippet;

pub use error::DeployError;
pub use request::{DeployQuery, DeployRequest};
pub use slug::{RandomSlug, SlugGenerator};

use crate::config::AppState;
use project::{CreateProject, Playground};

/// Where the caller is sent once the request is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Back to the dashboard's new-project page
    Landing,
    /// The project was created under this name
    Created { name: String },
}

/// Deploy the snippet described by `request`.
///
/// Snippet resolution failures end in [`DeployOutcome::Landing`]; project API
/// failures are returned as errors.
pub async fn deploy(
    state: &AppState,
    request: &DeployRequest,
) -> Result<DeployOutcome, DeployError> {
    let deploy_config = &state.config.deploy;

    let Some(token) = deploy_config.static_token().or(request.cookie.as_deref()) else {
        tracing::debug!("no credential, sending caller to landing page");
        return Ok(DeployOutcome::Landing);
    };

    let snippet = match snippet::resolve(
        &state.client,
        deploy_config,
        request.snippet_location(),
    )
    .await
    {
        Ok(snippet) if !snippet.text.is_empty() => snippet,
        Ok(snippet) => {
            tracing::debug!(url = %snippet.url, "snippet is empty");
            return Ok(DeployOutcome::Landing);
        }
        Err(e) if e.is_snippet_failure() => {
            tracing::debug!(error = %e, kind = e.error_type(), "snippet unavailable");
            return Ok(DeployOutcome::Landing);
        }
        Err(e) => return Err(e),
    };

    let body = CreateProject {
        name: state.slugs.generate(),
        env_vars: project::env_vars(request.query.env.as_deref()),
        playground: Playground {
            media_type: project::media_type(&snippet.url).map(ToString::to_string),
            snippet: snippet.text,
        },
    };

    tracing::info!(
        project = %body.name,
        source = %snippet.url,
        media_type = body.playground.media_type.as_deref().unwrap_or("-"),
        env_vars = body.env_vars.len(),
        "creating project"
    );

    project::create(
        &state.client,
        &deploy_config.projects_endpoint(),
        token,
        &body,
    )
    .await?;

    Ok(DeployOutcome::Created { name: body.name })
}
