//! Deploy error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("No snippet source: neither a url parameter nor a Referer header was given")]
    NoSnippetSource,

    #[error("Failed to fetch snippet: {0}")]
    SnippetFetch(#[source] reqwest::Error),

    #[error("GitHub response has no content field")]
    MissingContent,

    #[error("Snippet content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Snippet content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Upstream(#[source] reqwest::Error),

    /// The project API answered without a project name; holds its `message`
    #[error("{0}")]
    Rejected(String),
}

impl DeployError {
    /// Whether this failure happened while resolving the snippet.
    ///
    /// Such failures send the caller to the landing page instead of a 500.
    pub const fn is_snippet_failure(&self) -> bool {
        matches!(
            self,
            Self::NoSnippetSource
                | Self::SnippetFetch(_)
                | Self::MissingContent
                | Self::Base64(_)
                | Self::Utf8(_)
        )
    }

    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::NoSnippetSource => "no_snippet_source",
            Self::SnippetFetch(_) => "snippet_fetch",
            Self::MissingContent => "missing_content",
            Self::Base64(_) => "base64",
            Self::Utf8(_) => "utf8",
            Self::Upstream(_) => "upstream",
            Self::Rejected(_) => "rejected",
        }
    }
}
