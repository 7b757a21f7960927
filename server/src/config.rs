//! Environment-supplied configuration.
//!
//! Read once at startup. Missing credentials are not fatal: routes that need
//! them answer with a structured NotConfigured error instead, so the server
//! can still serve the model catalog and static assets.

use std::env;

use patchbay_github::Committer;
use patchbay_providers::DEFAULT_COMPLETION_API_URL;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub completion_api_key: Option<String>,
    pub completion_api_url: String,
    pub github_token: Option<String>,
    pub committer: Committer,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let port = non_empty("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            port,
            completion_api_key: non_empty("NEBIUS_API_KEY"),
            completion_api_url: non_empty("NEBIUS_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_API_URL.to_string()),
            github_token: non_empty("GITHUB_TOKEN"),
            committer: Committer {
                name: non_empty("GITHUB_NAME").unwrap_or_else(|| "Your Name".to_string()),
                email: non_empty("GITHUB_EMAIL")
                    .unwrap_or_else(|| "your-email@example.com".to_string()),
            },
        }
    }
}
