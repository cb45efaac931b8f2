//! Project creation request and its submission to the project API

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DeployError;

/// Extension of the last path segment, ignoring any query or fragment
static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^?#]*\.([^./?#]+)(?:[?#].*)?$").expect("valid regex"));

/// Environment variables attached to the new project
pub type EnvVars = BTreeMap<String, String>;

/// Body of `POST /projects`
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    pub env_vars: EnvVars,
    pub playground: Playground,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Playground {
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Fields of the project API answer this service looks at.
///
/// Both are loosely typed: only the presence of `name` decides the outcome.
#[derive(Debug, Default, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl ProjectResponse {
    fn has_name(&self) -> bool {
        self.name.as_ref().is_some_and(is_truthy)
    }

    fn message_text(&self) -> String {
        match &self.message {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build the variable map from a comma-separated list of names.
///
/// Every name maps to itself; empty names are skipped.
pub fn env_vars(list: Option<&str>) -> EnvVars {
    list.map(|names| {
        names
            .split(',')
            .filter(|name| !name.is_empty())
            .map(|name| (name.to_string(), name.to_string()))
            .collect()
    })
    .unwrap_or_default()
}

/// File extension of `url`, used as the playground media type
pub fn media_type(url: &str) -> Option<&str> {
    EXTENSION
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Submit `body` to the project API.
///
/// An answer without a `name` is a rejection; its `message` is passed through.
pub async fn create(
    client: &reqwest::Client,
    endpoint: &str,
    token: &str,
    body: &CreateProject,
) -> Result<(), DeployError> {
    let project: ProjectResponse = client
        .post(endpoint)
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .map_err(DeployError::Upstream)?
        .json()
        .await
        .map_err(DeployError::Upstream)?;

    if !project.has_name() {
        return Err(DeployError::Rejected(project.message_text()));
    }
    tracing::debug!(project = %body.name, answered = ?project.name, "project created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn sample_body() -> CreateProject {
        CreateProject {
            name: "brave-otter-12".to_string(),
            env_vars: env_vars(Some("FOO")),
            playground: Playground {
                snippet: "console.log(1)".to_string(),
                media_type: Some("ts".to_string()),
            },
        }
    }

    #[test]
    fn test_media_type() {
        assert_eq!(media_type("https://x.com/a/mod.ts"), Some("ts"));
        assert_eq!(media_type("https://x.com/a/mod.ts?x=1"), Some("ts"));
        assert_eq!(media_type("https://x.com/a/mod.tsx#L10"), Some("tsx"));
        assert_eq!(media_type("https://x.com/a/mod.js?v=1.2.3"), Some("js"));
        assert_eq!(media_type("https://x.com/a/mod"), None);
        assert_eq!(media_type("https://x.com/a/mod."), None);
    }

    #[test]
    fn test_env_vars() {
        let vars = env_vars(Some("A,B,C"));
        assert_eq!(vars.len(), 3);
        assert_eq!(vars["A"], "A");
        assert_eq!(vars["B"], "B");
        assert_eq!(vars["C"], "C");

        assert!(env_vars(Some("")).is_empty());
        assert!(env_vars(None).is_empty());
        assert_eq!(env_vars(Some("A,A,,B")).len(), 2);
    }

    #[test]
    fn test_body_shape() {
        let value = serde_json::to_value(sample_body()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "brave-otter-12",
                "envVars": { "FOO": "FOO" },
                "playground": { "snippet": "console.log(1)", "mediaType": "ts" }
            })
        );

        let mut body = sample_body();
        body.playground.media_type = None;
        let value = serde_json::to_value(body).unwrap();
        assert!(value["playground"].get("mediaType").is_none());
    }

    #[tokio::test]
    async fn test_create_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/projects")
                    .header("authorization", "Bearer abc123")
                    .json_body(serde_json::to_value(sample_body()).unwrap());
                then.status(200)
                    .json_body(json!({ "id": "p1", "name": "brave-otter-12" }));
            })
            .await;

        create(
            &reqwest::Client::new(),
            &server.url("/projects"),
            "abc123",
            &sample_body(),
        )
        .await
        .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_accepts_non_string_fields() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects");
                then.status(200).json_body(json!({
                    "name": "brave-otter-12",
                    "message": { "info": "created" }
                }));
            })
            .await;

        let result = create(
            &reqwest::Client::new(),
            &server.url("/projects"),
            "abc123",
            &sample_body(),
        )
        .await;

        assert!(result.is_ok(), "got: {result:?}");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name_with_structured_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects");
                then.status(400)
                    .json_body(json!({ "name": "", "message": { "field": "name" } }));
            })
            .await;

        let err = create(
            &reqwest::Client::new(),
            &server.url("/projects"),
            "abc123",
            &sample_body(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), r#"{"field":"name"}"#);
    }

    #[test]
    fn test_name_truthiness() {
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!({ "id": 1 })));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }

    #[tokio::test]
    async fn test_create_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects");
                then.status(401)
                    .json_body(json!({ "code": "unauthorized", "message": "Invalid token" }));
            })
            .await;

        let err = create(
            &reqwest::Client::new(),
            &server.url("/projects"),
            "bad",
            &sample_body(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DeployError::Rejected(ref m) if m == "Invalid token"));
    }

    #[tokio::test]
    async fn test_create_non_json_answer() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/projects");
                then.status(502).body("<html>Bad Gateway</html>");
            })
            .await;

        let err = create(
            &reqwest::Client::new(),
            &server.url("/projects"),
            "abc123",
            &sample_body(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DeployError::Upstream(_)));
    }
}
