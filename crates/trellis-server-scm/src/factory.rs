// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Provider selection from configuration.

use std::sync::Arc;

use tracing::info;
use trellis_server_config::ScmConfig;

use crate::client::ScmClient;
use crate::error::ScmResult;
use crate::github::GitHubClient;
use crate::gitlab::GitLabClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmProvider {
	GitHub,
	GitLab,
}

/// Map a provider name to a backend. Unknown or empty names select GitHub.
pub fn select_provider(name: &str) -> ScmProvider {
	match name.trim().to_ascii_lowercase().as_str() {
		"gitlab" => ScmProvider::GitLab,
		_ => ScmProvider::GitHub,
	}
}

/// Build the client chosen by `config.provider`.
pub fn create_scm_client(config: &ScmConfig) -> ScmResult<Arc<dyn ScmClient>> {
	let provider = select_provider(&config.provider);
	info!(requested = %config.provider, selected = ?provider, "selecting git host provider");

	let client: Arc<dyn ScmClient> = match provider {
		ScmProvider::GitHub => Arc::new(GitHubClient::from_config(config)?),
		ScmProvider::GitLab => Arc::new(GitLabClient::from_config(config)?),
	};
	Ok(client)
}
