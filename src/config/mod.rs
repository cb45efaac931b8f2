// Configuration module entry point
// Loads layered configuration and holds the per-process runtime state

mod state;
mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, DeployConfig, HealthConfig, LogFormat, LoggingConfig};

/// Environment variable holding the static deploy token
pub const TOKEN_ENV: &str = "DENO_TOKEN";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Layers, lowest precedence first: built-in defaults, the optional file,
    /// `SERVER_*` environment variables (`__` separates sections), `DENO_TOKEN`.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());

        let settings = Self::defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("deploy.token", token)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// A connection must outlive the two sequential upstream calls it may make
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let upstream_budget = self.upstream.timeout.saturating_mul(2);
        if self.performance.connection_timeout <= upstream_budget {
            return Err(ConfigError::Message(format!(
                "performance.connection_timeout ({}s) must exceed twice upstream.timeout ({}s)",
                self.performance.connection_timeout, self.upstream.timeout
            )));
        }
        Ok(())
    }

    /// Builder pre-populated with every default value
    pub(crate) fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 90)?
            .set_default("upstream.timeout", 30)?
            .set_default(
                "upstream.user_agent",
                concat!("snippet-deployer/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("deploy.dash_url", "https://dash.deno.com")?
            .set_default("deploy.api_url", "https://dash.deno.com/api")?
            .set_default("deploy.github_api_url", "https://api.github.com")?
            .set_default("deploy.snippet_file", "mod.ts")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Config;

    /// Build a config from defaults plus the given overrides, ignoring files and env
    pub fn config_with(overrides: &[(&str, &str)]) -> Config {
        let mut builder = Config::defaults().unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap().try_deserialize().unwrap()
    }
}
