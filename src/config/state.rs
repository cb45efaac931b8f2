// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;
use std::time::Duration;

use super::types::Config;
use crate::deploy::{RandomSlug, SlugGenerator};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Pooled client for snippet hosts, GitHub and the project API
    pub client: reqwest::Client,
    pub slugs: Arc<dyn SlugGenerator>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Self::with_slug_generator(config, Arc::new(RandomSlug))
    }

    pub fn with_slug_generator(
        config: &Config,
        slugs: Arc<dyn SlugGenerator>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.upstream.user_agent.clone())
            .timeout(Duration::from_secs(config.upstream.timeout))
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
            slugs,
        })
    }
}
