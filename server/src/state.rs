//! Shared handler state.
//!
//! Holds only the outbound clients. There is no session store and no cached
//! conversation or file state: every request carries its full context.

use patchbay_github::GithubClient;
use patchbay_providers::CompletionClient;

use crate::config::ServerConfig;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    completion: Option<CompletionClient>,
    github: Option<GithubClient>,
}

impl AppState {
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let completion = config
            .completion_api_key
            .as_ref()
            .map(|key| CompletionClient::new(key, &config.completion_api_url));
        let github = config
            .github_token
            .as_ref()
            .map(|token| GithubClient::new(token, config.committer.clone()));
        Self { completion, github }
    }

    #[must_use]
    pub fn new(completion: Option<CompletionClient>, github: Option<GithubClient>) -> Self {
        Self { completion, github }
    }

    pub fn completion(&self) -> Result<&CompletionClient, ApiError> {
        self.completion
            .as_ref()
            .ok_or_else(|| ApiError::not_configured("Completion API key"))
    }

    pub fn github(&self) -> Result<&GithubClient, ApiError> {
        self.github
            .as_ref()
            .ok_or_else(|| ApiError::not_configured("GitHub token"))
    }
}
