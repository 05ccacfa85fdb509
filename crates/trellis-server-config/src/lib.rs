// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Trellis server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`TRELLIS_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use trellis_server_config::load_config_with_file;
//!
//! let config = load_config_with_file("./config.toml")?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, DEFAULT_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub auth: AuthConfig,
	pub database: DatabaseConfig,
	pub scm: ScmConfig,
	pub kubernetes: KubernetesConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration with the default file path.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TRELLIS_SERVER_*`)
/// 2. Config file (`./config.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_config_with_file(DEFAULT_CONFIG_PATH)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let scm = layer.scm.unwrap_or_default().finalize();
	let kubernetes = layer.kubernetes.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&auth, &database)?;

	info!(
		host = %http.host,
		port = http.port,
		environment = %auth.environment,
		database_backend = %database.backend,
		scm_provider = %scm.provider,
		kubernetes_enabled = kubernetes.enabled,
		signing_key_configured = auth.jwt_signing_key.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		auth,
		database,
		scm,
		kubernetes,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(auth: &AuthConfig, database: &DatabaseConfig) -> Result<(), ConfigError> {
	let key_missing = auth
		.jwt_signing_key
		.as_ref()
		.map(|k| k.is_blank())
		.unwrap_or(true);
	if auth.is_production() && key_missing {
		return Err(ConfigError::Validation(
			"TRELLIS_SERVER_JWT_SIGNING_KEY must be set when TRELLIS_SERVER_ENV=production"
				.to_string(),
		));
	}

	if database.max_connections == 0 {
		return Err(ConfigError::InvalidValue {
			key: "database.max_connections".to_string(),
			message: "must be at least 1".to_string(),
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use trellis_common_secret::SecretString;

	#[test]
	fn test_production_requires_signing_key() {
		let auth = AuthConfig {
			environment: "production".to_string(),
			jwt_signing_key: None,
		};
		let result = validate_config(&auth, &DatabaseConfig::default());
		assert!(result.unwrap_err().to_string().contains("JWT_SIGNING_KEY"));
	}

	#[test]
	fn test_production_rejects_blank_signing_key() {
		let auth = AuthConfig {
			environment: "production".to_string(),
			jwt_signing_key: Some(SecretString::new("  ".to_string())),
		};
		assert!(validate_config(&auth, &DatabaseConfig::default()).is_err());
	}

	#[test]
	fn test_development_without_key_ok() {
		assert!(validate_config(&AuthConfig::default(), &DatabaseConfig::default()).is_ok());
	}

	#[test]
	fn test_zero_connections_rejected() {
		let database = DatabaseConfig {
			max_connections: 0,
			..Default::default()
		};
		assert!(validate_config(&AuthConfig::default(), &database).is_err());
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_file_layer_overrides_defaults() {
		struct FileLayer;
		impl ConfigSource for FileLayer {
			fn name(&self) -> &'static str {
				"test-file"
			}
			fn precedence(&self) -> Precedence {
				Precedence::ConfigFile
			}
			fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
				Ok(toml::from_str("[http]\nport = 8081\n[scm]\nprovider = \"gitlab\"").unwrap())
			}
		}

		let config =
			load_from_sources(vec![Box::new(FileLayer), Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config.http.port, 8081);
		assert_eq!(config.scm.provider, "gitlab");
		assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
	}
}
