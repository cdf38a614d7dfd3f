//! Explicitly constructed application context
//!
//! Built once in `main` and handed to whatever needs it. Holds the loaded
//! configuration, the log buffer shown in the debug pane, and the search
//! collaborator.

use crate::api::{HttpSearchClient, SearchClient};
use crate::config::Config;
use crate::services::MemorySearchClient;
use crate::utils::{LogRingBuffer, LoggingHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct AppContext {
    pub config: Config,
    pub logging: LoggingHandle,
    pub client: Arc<dyn SearchClient>,
}

impl AppContext {
    /// Pick the collaborator from the config: HTTP when a base URL is set,
    /// the built-in demo data otherwise
    pub fn new(config: Config, logging: LoggingHandle) -> Self {
        let client = Self::client_for(&config);
        info!(target: "app", "Using {} search backend", client.name());
        Self {
            config,
            logging,
            client,
        }
    }

    /// Use a specific collaborator, e.g. a stub in tests
    pub fn with_client(config: Config, logging: LoggingHandle, client: Arc<dyn SearchClient>) -> Self {
        Self {
            config,
            logging,
            client,
        }
    }

    pub fn client_for(config: &Config) -> Arc<dyn SearchClient> {
        match &config.backend.base_url {
            Some(url) if !url.trim().is_empty() => Arc::new(
                HttpSearchClient::new(url).with_token(config.backend.auth_token.clone()),
            ),
            _ => Arc::new(
                MemorySearchClient::demo()
                    .with_latency(Duration::from_millis(config.backend.demo_latency_ms)),
            ),
        }
    }

    pub fn log_buffer(&self) -> &LogRingBuffer {
        &self.logging.buffer
    }

    pub fn shutdown(self) {
        info!(target: "app", "Shutting down");
        if let Some(path) = &self.logging.log_path {
            eprintln!("Session log: {}", path.display());
        }
    }
}
