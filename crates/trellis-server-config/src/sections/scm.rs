// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source-control provider configuration.

use serde::Deserialize;
use trellis_common_secret::SecretString;

pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com/";
pub const DEFAULT_GITLAB_BASE_URL: &str = "https://gitlab.com/api/v4/";

/// Source-control configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct ScmConfig {
	/// `github` or `gitlab`; anything else falls back to GitHub.
	pub provider: String,
	pub github_token: Option<SecretString>,
	pub gitlab_token: Option<SecretString>,
	pub github_base_url: String,
	pub gitlab_base_url: String,
	pub timeout_secs: u64,
}

impl Default for ScmConfig {
	fn default() -> Self {
		ScmConfigLayer::default().finalize()
	}
}

/// Source-control configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScmConfigLayer {
	#[serde(default)]
	pub provider: Option<String>,
	#[serde(default)]
	pub github_token: Option<SecretString>,
	#[serde(default)]
	pub gitlab_token: Option<SecretString>,
	#[serde(default)]
	pub github_base_url: Option<String>,
	#[serde(default)]
	pub gitlab_base_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl ScmConfigLayer {
	pub fn merge(&mut self, other: ScmConfigLayer) {
		if other.provider.is_some() {
			self.provider = other.provider;
		}
		if other.github_token.is_some() {
			self.github_token = other.github_token;
		}
		if other.gitlab_token.is_some() {
			self.gitlab_token = other.gitlab_token;
		}
		if other.github_base_url.is_some() {
			self.github_base_url = other.github_base_url;
		}
		if other.gitlab_base_url.is_some() {
			self.gitlab_base_url = other.gitlab_base_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> ScmConfig {
		ScmConfig {
			provider: self.provider.unwrap_or_else(|| "github".to_string()),
			github_token: self.github_token,
			gitlab_token: self.gitlab_token,
			github_base_url: self
				.github_base_url
				.unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.to_string()),
			gitlab_base_url: self
				.gitlab_base_url
				.unwrap_or_else(|| DEFAULT_GITLAB_BASE_URL.to_string()),
			timeout_secs: self.timeout_secs.unwrap_or(30),
		}
	}
}
