// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for git host clients.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

pub type ScmResult<T> = Result<T, ScmError>;

/// Errors surfaced by a [`crate::ScmClient`]. None of them are retried.
#[derive(Debug, Error)]
pub enum ScmError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("Request timed out")]
	Timeout,

	#[error("Unauthorized: missing or invalid token")]
	Unauthorized,

	#[error("Forbidden or insufficient permissions")]
	Forbidden,

	#[error("Rate limit exceeded")]
	RateLimited,

	#[error("Not found: {0}")]
	NotFound(String),

	/// The requested name collides with an existing repository.
	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("{provider} API error: {status} - {message}")]
	ApiError {
		provider: &'static str,
		status: u16,
		message: String,
	},

	#[error("Invalid response from {provider}: {message}")]
	InvalidResponse {
		provider: &'static str,
		message: String,
	},

	#[error("Configuration error: {0}")]
	Config(String),
}

impl ScmError {
	pub fn invalid_response(provider: &'static str, message: impl Into<String>) -> Self {
		Self::InvalidResponse {
			provider,
			message: message.into(),
		}
	}

	/// True when the error means the target object does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_))
	}
}

/// Map a transport error, distinguishing timeouts.
pub(crate) fn map_transport_error(e: reqwest::Error) -> ScmError {
	if e.is_timeout() {
		return ScmError::Timeout;
	}
	ScmError::Network(e)
}

/// Map a non-success response from a git host into an [`ScmError`].
///
/// Name collisions come back as 422 from GitHub and as 400 ("has already
/// been taken") or 409 from GitLab; both become [`ScmError::Conflict`].
pub(crate) fn map_status_error(provider: &'static str, status: StatusCode, body: &str) -> ScmError {
	let status_code = status.as_u16();
	let lowered = body.to_lowercase();

	match status_code {
		401 => {
			warn!(provider, status = status_code, "Unauthorized request to git host");
			ScmError::Unauthorized
		}
		403 | 429 if lowered.contains("rate limit") || status_code == 429 => {
			warn!(provider, status = status_code, "Git host rate limit exceeded");
			ScmError::RateLimited
		}
		403 => {
			warn!(provider, status = status_code, "Forbidden request to git host");
			ScmError::Forbidden
		}
		404 => ScmError::NotFound(body.to_string()),
		409 => ScmError::Conflict(body.to_string()),
		400 | 422
			if lowered.contains("already exists") || lowered.contains("has already been taken") =>
		{
			ScmError::Conflict(body.to_string())
		}
		_ => {
			error!(provider, status = status_code, body = %body, "Git host API error");
			ScmError::ApiError {
				provider,
				status: status_code,
				message: body.to_string(),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_auth_failures() {
		assert!(matches!(
			map_status_error("GitHub", StatusCode::UNAUTHORIZED, ""),
			ScmError::Unauthorized
		));
		assert!(matches!(
			map_status_error("GitHub", StatusCode::FORBIDDEN, "Resource not accessible"),
			ScmError::Forbidden
		));
		assert!(matches!(
			map_status_error("GitHub", StatusCode::FORBIDDEN, "API rate limit exceeded"),
			ScmError::RateLimited
		));
	}

	#[test]
	fn maps_github_name_collision_to_conflict() {
		let body = r#"{"message":"Repository creation failed.","errors":[{"message":"name already exists on this account"}]}"#;
		assert!(matches!(
			map_status_error("GitHub", StatusCode::UNPROCESSABLE_ENTITY, body),
			ScmError::Conflict(_)
		));
	}

	#[test]
	fn maps_gitlab_name_collision_to_conflict() {
		let body = r#"{"message":{"name":["has already been taken"]}}"#;
		assert!(matches!(
			map_status_error("GitLab", StatusCode::BAD_REQUEST, body),
			ScmError::Conflict(_)
		));
	}

	#[test]
	fn other_validation_errors_stay_api_errors() {
		let err = map_status_error("GitHub", StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed");
		match err {
			ScmError::ApiError { status, .. } => assert_eq!(status, 422),
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn not_found_is_flagged() {
		assert!(map_status_error("GitLab", StatusCode::NOT_FOUND, "").is_not_found());
	}
}
