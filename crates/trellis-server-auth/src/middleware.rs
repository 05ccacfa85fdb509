// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication helpers used by the server's auth layer.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::instrument;
use trellis_common_secret::SecretString;

use crate::error::{AuthError, Result};
use crate::jwt::{validate_token, Claims};

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
///
/// # Returns
///
/// The bearer token value if found, or `None` if not present or malformed.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}

/// Validate the request's bearer token against `key`.
pub fn authenticate(headers: &HeaderMap, key: &SecretString) -> Result<Claims> {
	let token = extract_bearer_token(headers).ok_or(AuthError::MissingToken)?;
	validate_token(key, &token)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::jwt::issue_token;
	use http::HeaderValue;

	fn headers_with(value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
		headers
	}

	#[test]
	fn test_extract_bearer_token() {
		assert_eq!(
			extract_bearer_token(&headers_with("Bearer abc.def")),
			Some("abc.def".to_string())
		);
		assert_eq!(extract_bearer_token(&headers_with("Basic Zm9v")), None);
		assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
		assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
	}

	#[test]
	fn test_authenticate() {
		let key = SecretString::new("k".to_string());
		let token = issue_token(&key).unwrap();

		assert!(authenticate(&headers_with(&format!("Bearer {token}")), &key).is_ok());
		assert!(matches!(
			authenticate(&HeaderMap::new(), &key),
			Err(AuthError::MissingToken)
		));
	}
}
