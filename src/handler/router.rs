//! Request routing dispatch module
//!
//! Entry point for HTTP request processing and the error boundary that turns
//! deploy failures into 500 responses.

use crate::config::{AppState, HealthConfig};
use crate::deploy::{self, DeployOutcome, DeployRequest};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

/// Routes known to this server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Liveness,
    Readiness,
    Deploy,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match route(&path, &state.config.routes.health) {
        Route::Liveness | Route::Readiness => http::build_health_response("ok"),
        Route::Deploy => {
            let request = DeployRequest::from_request(&req);
            drop(req);
            serve_deploy(&state, &request).await
        }
    };

    if state.config.logging.access_log {
        logger::log_access(&method, &path, response.status(), started.elapsed());
    }

    Ok(response)
}

fn route(path: &str, health: &HealthConfig) -> Route {
    if health.enabled {
        if path == health.liveness_path {
            return Route::Liveness;
        }
        if path == health.readiness_path {
            return Route::Readiness;
        }
    }
    Route::Deploy
}

/// Run the deployer and map its outcome to a response
async fn serve_deploy(state: &AppState, request: &DeployRequest) -> Response<Full<Bytes>> {
    let deploy_config = &state.config.deploy;
    match deploy::deploy(state, request).await {
        Ok(DeployOutcome::Landing) => http::build_redirect_response(&deploy_config.landing_url()),
        Ok(DeployOutcome::Created { name }) => {
            http::build_redirect_response(&deploy_config.settings_url(&name))
        }
        Err(e) => {
            logger::log_deploy_error(&e);
            http::build_error_response(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_with;
    use crate::deploy::tests::state_for;
    use http_body_util::BodyExt;
    use httpmock::prelude::*;
    use hyper::header::LOCATION;
    use hyper::StatusCode;
    use serde_json::json;

    fn get(uri: &str) -> hyper::http::request::Builder {
        Request::builder().method("GET").uri(uri)
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_route_health() {
        let health = HealthConfig::default();
        assert_eq!(route("/healthz", &health), Route::Liveness);
        assert_eq!(route("/readyz", &health), Route::Readiness);
        assert_eq!(route("/", &health), Route::Deploy);
        assert_eq!(route("/anything/else", &health), Route::Deploy);

        let disabled = HealthConfig {
            enabled: false,
            ..HealthConfig::default()
        };
        assert_eq!(route("/healthz", &disabled), Route::Deploy);
    }

    #[tokio::test]
    async fn test_health_probe() {
        let state = Arc::new(state_for(&config_with(&[])));
        let resp = handle_request(get("/healthz").body(()).unwrap(), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "ok");
    }

    #[tokio::test]
    async fn test_unauthenticated_redirects_to_landing() {
        let state = Arc::new(state_for(&config_with(&[])));
        let req = get("/?url=https://example.com/snip.py&env=A")
            .body(())
            .unwrap();
        let resp = handle_request(req, state).await.unwrap();

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "https://dash.deno.com/new");
    }

    #[tokio::test]
    async fn test_success_redirects_to_settings() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/snip.py");
                then.status(200).body("print(1)");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/projects")
                    .header("authorization", "Bearer abc123");
                then.status(200).json_body(json!({ "name": "xyz-slug" }));
            })
            .await;

        let config = config_with(&[("deploy.api_url", server.url("/api").as_str())]);
        let state = Arc::new(state_for(&config));
        let req = get(&format!("/?url={}&env=FOO,BAR", server.url("/snip.py")))
            .header("Cookie", "abc123")
            .body(())
            .unwrap();
        let resp = handle_request(req, state).await.unwrap();

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers()[LOCATION],
            "https://dash.deno.com/projects/xyz-slug/settings"
        );
    }

    #[tokio::test]
    async fn test_rejection_becomes_500_with_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/snip.py");
                then.status(200).body("print(1)");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/projects");
                then.status(401).json_body(json!({ "message": "Unauthorized" }));
            })
            .await;

        let config = config_with(&[("deploy.api_url", server.url("/api").as_str())]);
        let state = Arc::new(state_for(&config));
        let req = get(&format!("/?url={}", server.url("/snip.py")))
            .header("Cookie", "expired")
            .body(())
            .unwrap();
        let resp = handle_request(req, state).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(resp).await, "Unauthorized");
    }
}
