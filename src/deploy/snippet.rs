//! Snippet resolution
//!
//! Turns a location (the `url` parameter or the `Referer` header) into source
//! text. GitHub repository links are rewritten to the contents API and the
//! configured snippet file is fetched from the default branch; any other
//! location is fetched as-is and its body used verbatim.

use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;
use serde::Deserialize;

use super::error::DeployError;
use crate::config::DeployConfig;

static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)").expect("valid regex")
});

/// A resolved snippet and the URL it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub url: String,
    pub text: String,
}

/// Where the snippet text is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetSource {
    /// Contents API document with a base64 `content` field
    GitHub { api_url: String },
    /// Plain body text
    Direct { url: String },
}

impl SnippetSource {
    /// Classify a location, rewriting GitHub repository links
    pub fn from_location(location: &str, config: &DeployConfig) -> Self {
        match github_repo(location) {
            Some((owner, repo)) => Self::GitHub {
                api_url: format!(
                    "{}/repos/{owner}/{repo}/contents/{}",
                    config.github_api_url.trim_end_matches('/'),
                    config.snippet_file
                ),
            },
            None => Self::Direct {
                url: location.to_string(),
            },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::GitHub { api_url } => api_url,
            Self::Direct { url } => url,
        }
    }
}

/// Owner and repository of a `https://github.com/<owner>/<repo>...` link
pub fn github_repo(location: &str) -> Option<(&str, &str)> {
    let caps = GITHUB_REPO.captures(location)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: Option<String>,
}

/// Fetch the snippet named by `location`.
///
/// A missing location fails with `NoSnippetSource` without touching the network.
pub async fn resolve(
    client: &reqwest::Client,
    config: &DeployConfig,
    location: Option<&str>,
) -> Result<Snippet, DeployError> {
    let location = location
        .filter(|l| !l.is_empty())
        .ok_or(DeployError::NoSnippetSource)?;
    let source = SnippetSource::from_location(location, config);

    let text = match &source {
        SnippetSource::GitHub { api_url } => {
            let body: ContentsResponse = client
                .get(api_url)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(DeployError::SnippetFetch)?
                .json()
                .await
                .map_err(DeployError::SnippetFetch)?;
            decode_content(&body.content.ok_or(DeployError::MissingContent)?)?
        }
        // Any status counts; the body is the snippet
        SnippetSource::Direct { url } => client
            .get(url)
            .send()
            .await
            .map_err(DeployError::SnippetFetch)?
            .text()
            .await
            .map_err(DeployError::SnippetFetch)?,
    };

    Ok(Snippet {
        url: source.url().to_string(),
        text,
    })
}

/// Decode a contents API payload; GitHub wraps the base64 at 60 columns
pub fn decode_content(content: &str) -> Result<String, DeployError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
