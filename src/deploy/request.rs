//! Inputs of a deploy request

use hyper::header::{HeaderName, COOKIE, REFERER};
use hyper::Request;

/// Recognized query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployQuery {
    /// Snippet location
    pub url: Option<String>,
    /// Comma-separated environment variable names
    pub env: Option<String>,
}

impl DeployQuery {
    /// Parse a raw query string; the last occurrence of a key wins
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return parsed;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "url" => parsed.url = Some(value.into_owned()),
                "env" => parsed.env = Some(value.into_owned()),
                _ => {}
            }
        }
        parsed
    }
}

/// Everything the deployer reads from an incoming request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployRequest {
    pub query: DeployQuery,
    pub cookie: Option<String>,
    pub referer: Option<String>,
}

impl DeployRequest {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        Self {
            query: DeployQuery::parse(req.uri().query()),
            cookie: header(COOKIE),
            referer: header(REFERER),
        }
    }

    /// Snippet location: the `url` parameter, else the referring page
    pub fn snippet_location(&self) -> Option<&str> {
        self.query.url.as_deref().or(self.referer.as_deref())
    }
}
