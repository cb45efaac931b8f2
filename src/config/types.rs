// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub upstream: UpstreamConfig,
    pub deploy: DeployConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
    pub access_log: bool,
}

/// Output format of the tracing subscriber
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on the lifetime of one client connection, in seconds
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Outbound HTTP client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Per-call timeout in seconds
    pub timeout: u64,
    pub user_agent: String,
}

/// Deployment target configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DeployConfig {
    /// Static bearer token; when unset the request's `Cookie` is used
    #[serde(default)]
    pub token: Option<String>,
    /// Dashboard base used for redirects
    pub dash_url: String,
    /// Project API base
    pub api_url: String,
    pub github_api_url: String,
    /// File fetched from GitHub repositories
    pub snippet_file: String,
}

impl DeployConfig {
    /// Static token, if one is configured and non-empty
    pub fn static_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn landing_url(&self) -> String {
        format!("{}/new", self.dash_url.trim_end_matches('/'))
    }

    pub fn settings_url(&self, project: &str) -> String {
        format!(
            "{}/projects/{project}/settings",
            self.dash_url.trim_end_matches('/')
        )
    }

    pub fn projects_endpoint(&self) -> String {
        format!("{}/projects", self.api_url.trim_end_matches('/'))
    }
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
