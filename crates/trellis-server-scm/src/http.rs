// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request plumbing shared by the GitHub and GitLab clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{map_status_error, map_transport_error, ScmError, ScmResult};

/// Parse a REST base URL, forcing a trailing slash so `join` appends.
pub(crate) fn parse_base_url(raw: &str) -> ScmResult<Url> {
	let normalized = if raw.ends_with('/') {
		raw.to_string()
	} else {
		format!("{raw}/")
	};

	let url = Url::parse(&normalized)
		.map_err(|e| ScmError::Config(format!("Invalid base URL '{raw}': {e}")))?;

	match url.scheme() {
		"https" | "http" => Ok(url),
		other => Err(ScmError::Config(format!(
			"Base URL must use http or https, got '{other}'"
		))),
	}
}

pub(crate) fn build_http_client(timeout_secs: u64) -> ScmResult<Client> {
	trellis_common_http::new_client_with_timeout(Duration::from_secs(timeout_secs))
		.map_err(|e| ScmError::Config(format!("Failed to build HTTP client: {e}")))
}

pub(crate) fn join(base: &Url, path: &str) -> ScmResult<Url> {
	base.join(path)
		.map_err(|e| ScmError::Config(format!("Invalid URL: {e}")))
}

/// Percent-encode a single path segment (owner, repo, or `owner/repo`).
pub(crate) fn segment(value: &str) -> String {
	urlencoding::encode(value).into_owned()
}

/// Send the request and turn non-2xx statuses into [`ScmError`].
pub(crate) async fn send(provider: &'static str, request: RequestBuilder) -> ScmResult<Response> {
	let response = request.send().await.map_err(map_transport_error)?;

	let status = response.status();
	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		return Err(map_status_error(provider, status, &body));
	}
	Ok(response)
}

pub(crate) async fn read_json<T: DeserializeOwned>(
	provider: &'static str,
	response: Response,
) -> ScmResult<T> {
	response.json::<T>().await.map_err(|e| {
		error!(provider, error = %e, "Failed to parse git host response");
		ScmError::invalid_response(provider, e.to_string())
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_url_gains_trailing_slash() {
		let url = parse_base_url("https://gitlab.example.com/api/v4").unwrap();
		assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/");
		assert_eq!(
			join(&url, "projects").unwrap().as_str(),
			"https://gitlab.example.com/api/v4/projects"
		);
	}

	#[test]
	fn base_url_rejects_other_schemes() {
		assert!(matches!(
			parse_base_url("ftp://example.com"),
			Err(ScmError::Config(_))
		));
	}

	#[test]
	fn segment_encodes_slash() {
		assert_eq!(segment("group/project"), "group%2Fproject");
		assert_eq!(segment("plain"), "plain");
	}
}
