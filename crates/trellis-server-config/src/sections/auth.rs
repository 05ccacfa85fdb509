// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.

use serde::Deserialize;
use trellis_common_secret::SecretString;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Deployment phase tag, e.g. `development` or `production`.
	pub environment: String,
	/// HMAC key for issuing and validating bearer tokens.
	pub jwt_signing_key: Option<SecretString>,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			environment: "development".to_string(),
			jwt_signing_key: None,
		}
	}
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default, alias = "phase")]
	pub environment: Option<String>,
	#[serde(default)]
	pub jwt_signing_key: Option<SecretString>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.jwt_signing_key.is_some() {
			self.jwt_signing_key = other.jwt_signing_key;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
			jwt_signing_key: self.jwt_signing_key,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = AuthConfigLayer::default().finalize();
		assert_eq!(config.environment, "development");
		assert!(config.jwt_signing_key.is_none());
		assert!(!config.is_production());
	}

	#[test]
	fn test_phase_alias() {
		let layer: AuthConfigLayer = toml::from_str(r#"phase = "Production""#).unwrap();
		assert!(layer.finalize().is_production());
	}

	#[test]
	fn test_signing_key_is_redacted_in_debug() {
		let config = AuthConfigLayer {
			jwt_signing_key: Some(SecretString::new("top-secret".to_string())),
			..Default::default()
		}
		.finalize();
		assert!(!format!("{config:?}").contains("top-secret"));
	}
}
