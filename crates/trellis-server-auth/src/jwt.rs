// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HS256 access tokens.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use trellis_common_secret::SecretString;

use crate::error::{AuthError, Result};

/// Issued tokens are valid for 72 hours.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(72 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Issued at (seconds since epoch).
	pub iat: u64,
	/// Expiration (seconds since epoch).
	pub exp: u64,
}

fn signing_key(key: &SecretString) -> Result<&[u8]> {
	if key.is_blank() {
		return Err(AuthError::MissingSigningKey);
	}
	Ok(key.expose().as_bytes())
}

fn now_secs() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

/// Sign a token issued now.
pub fn issue_token(key: &SecretString) -> Result<String> {
	issue_token_at(key, now_secs())
}

/// Sign a token issued at `iat`, expiring [`TOKEN_LIFETIME`] later.
#[instrument(skip(key))]
pub fn issue_token_at(key: &SecretString, iat: u64) -> Result<String> {
	let claims = Claims {
		iat,
		exp: iat + TOKEN_LIFETIME.as_secs(),
	};

	let token = encode(
		&Header::new(Algorithm::HS256),
		&claims,
		&EncodingKey::from_secret(signing_key(key)?),
	)
	.map_err(|e| AuthError::Signing(e.to_string()))?;

	debug!(exp = claims.exp, "issued access token");
	Ok(token)
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(key: &SecretString, token: &str) -> Result<Claims> {
	let mut validation = Validation::new(Algorithm::HS256);
	validation.set_required_spec_claims(&["exp"]);

	decode::<Claims>(
		token,
		&DecodingKey::from_secret(signing_key(key)?),
		&validation,
	)
	.map(|data| data.claims)
	.map_err(|e| match e.kind() {
		ErrorKind::ExpiredSignature => AuthError::Expired,
		_ => AuthError::InvalidToken(e.to_string()),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key() -> SecretString {
		SecretString::new("test-signing-key".to_string())
	}

	#[test]
	fn test_round_trip_has_72h_lifetime() {
		let token = issue_token(&key()).unwrap();
		assert!(!token.is_empty());

		let claims = validate_token(&key(), &token).unwrap();
		assert_eq!(claims.exp - claims.iat, 72 * 3600);
	}

	#[test]
	fn test_header_is_hs256() {
		let token = issue_token(&key()).unwrap();
		let header = jsonwebtoken::decode_header(&token).unwrap();
		assert_eq!(header.alg, Algorithm::HS256);
	}

	#[test]
	fn test_wrong_key_rejected() {
		let token = issue_token(&key()).unwrap();
		let other = SecretString::new("another-key".to_string());
		assert!(matches!(
			validate_token(&other, &token),
			Err(AuthError::InvalidToken(_))
		));
	}

	#[test]
	fn test_expired_token_rejected() {
		let token = issue_token_at(&key(), 1_000).unwrap();
		assert!(matches!(validate_token(&key(), &token), Err(AuthError::Expired)));
	}

	#[test]
	fn test_blank_key_refused() {
		let blank = SecretString::new("  ".to_string());
		assert!(matches!(issue_token(&blank), Err(AuthError::MissingSigningKey)));
		assert!(matches!(
			validate_token(&blank, "a.b.c"),
			Err(AuthError::MissingSigningKey)
		));
	}

	#[test]
	fn test_garbage_rejected() {
		assert!(matches!(
			validate_token(&key(), "not-a-jwt"),
			Err(AuthError::InvalidToken(_))
		));
	}
}
