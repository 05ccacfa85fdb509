// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, KubernetesConfigLayer,
	LoggingConfigLayer, ScmConfigLayer,
};

/// Server configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub scm: Option<ScmConfigLayer>,
	#[serde(default)]
	pub kubernetes: Option<KubernetesConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.auth, other.auth, AuthConfigLayer::merge);
		merge_option(
			&mut self.database,
			other.database,
			DatabaseConfigLayer::merge,
		);
		merge_option(&mut self.scm, other.scm, ScmConfigLayer::merge);
		merge_option(
			&mut self.kubernetes,
			other.kubernetes,
			KubernetesConfigLayer::merge,
		);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

pub(crate) fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_empty_layers() {
		let mut base = ServerConfigLayer::default();
		base.merge(ServerConfigLayer::default());
		assert!(base.http.is_none());
		assert!(base.scm.is_none());
	}

	#[test]
	fn test_merge_other_overwrites() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				host: Some("127.0.0.1".to_string()),
			}),
			..Default::default()
		};
		let other = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(8080),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(other);
		let http = base.http.unwrap();
		assert_eq!(http.port, Some(8080));
		assert_eq!(http.host, Some("127.0.0.1".to_string()));
	}

	#[test]
	fn test_merge_adds_missing_sections() {
		let mut base = ServerConfigLayer::default();
		let other = ServerConfigLayer {
			scm: Some(ScmConfigLayer {
				provider: Some("gitlab".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(other);
		assert_eq!(base.scm.unwrap().provider, Some("gitlab".to_string()));
	}

	#[test]
	fn test_parse_full_toml() {
		let toml = r#"
			[http]
			host = "127.0.0.1"
			port = 1323

			[auth]
			environment = "production"
			jwt_signing_key = "s3cret"

			[database]
			backend = "postgres"

			[database.postgres]
			host = "db.internal"
			dbname = "trellis"

			[scm]
			provider = "gitlab"

			[kubernetes]
			enabled = true
			kubeconfig_path = "/etc/trellis/kubeconfig"

			[logging]
			level = "debug"
		"#;
		let layer: ServerConfigLayer = toml::from_str(toml).unwrap();
		assert_eq!(layer.http.unwrap().port, Some(1323));
		let auth = layer.auth.unwrap();
		assert_eq!(auth.jwt_signing_key.unwrap().expose(), "s3cret");
		let postgres = layer.database.unwrap().postgres.unwrap();
		assert_eq!(postgres.host.as_deref(), Some("db.internal"));
		assert_eq!(layer.kubernetes.unwrap().enabled, Some(true));
	}
}
