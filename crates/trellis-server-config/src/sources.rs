// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use trellis_common_secret::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseBackend, DatabaseConfigLayer, HttpConfigLayer, KubernetesConfigLayer,
	LoggingConfigLayer, PostgresConfigLayer, ScmConfigLayer,
};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl Default for TomlSource {
	fn default() -> Self {
		Self::new(DEFAULT_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TRELLIS_SERVER_<SECTION>_<FIELD>. Secrets also accept the
/// `<NAME>_FILE` form.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			auth: Some(load_auth_from_env()?),
			database: Some(load_database_from_env()?),
			scm: Some(load_scm_from_env()?),
			kubernetes: Some(load_kubernetes_from_env()?),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("TRELLIS_SERVER_HOST"),
		port: env_parse("TRELLIS_SERVER_PORT", "u16")?,
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		environment: env_var("TRELLIS_SERVER_ENV"),
		jwt_signing_key: load_secret_env("TRELLIS_SERVER_JWT_SIGNING_KEY")?,
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	let backend = match env_var("TRELLIS_SERVER_DATABASE_BACKEND") {
		Some(name) => Some(DatabaseBackend::parse(&name).ok_or_else(|| {
			ConfigError::InvalidValue {
				key: "TRELLIS_SERVER_DATABASE_BACKEND".to_string(),
				message: format!("unknown backend '{name}', expected sqlite or postgres"),
			}
		})?),
		None => None,
	};

	Ok(DatabaseConfigLayer {
		backend,
		url: env_var("TRELLIS_SERVER_DATABASE_URL"),
		postgres: Some(PostgresConfigLayer {
			host: env_var("TRELLIS_SERVER_POSTGRES_HOST"),
			port: env_parse("TRELLIS_SERVER_POSTGRES_PORT", "u16")?,
			dbname: env_var("TRELLIS_SERVER_POSTGRES_DBNAME"),
			user: env_var("TRELLIS_SERVER_POSTGRES_USER"),
			password: load_secret_env("TRELLIS_SERVER_POSTGRES_PASSWORD")?,
			sslmode: env_var("TRELLIS_SERVER_POSTGRES_SSLMODE"),
			timezone: env_var("TRELLIS_SERVER_POSTGRES_TIMEZONE"),
		}),
		max_connections: env_parse("TRELLIS_SERVER_DATABASE_MAX_CONNECTIONS", "u32")?,
	})
}

fn load_scm_from_env() -> Result<ScmConfigLayer, ConfigError> {
	Ok(ScmConfigLayer {
		provider: env_var("TRELLIS_SERVER_SCM_PROVIDER"),
		github_token: load_secret_env("TRELLIS_SERVER_GITHUB_TOKEN")?,
		gitlab_token: load_secret_env("TRELLIS_SERVER_GITLAB_TOKEN")?,
		github_base_url: env_var("TRELLIS_SERVER_GITHUB_BASE_URL"),
		gitlab_base_url: env_var("TRELLIS_SERVER_GITLAB_BASE_URL"),
		timeout_secs: env_parse("TRELLIS_SERVER_SCM_TIMEOUT_SECS", "u64")?,
	})
}

fn load_kubernetes_from_env() -> Result<KubernetesConfigLayer, ConfigError> {
	Ok(KubernetesConfigLayer {
		enabled: env_bool("TRELLIS_SERVER_K8S_ENABLED"),
		kubeconfig_path: env_var("TRELLIS_SERVER_KUBECONFIG_PATH").map(PathBuf::from),
		kubeconfig: load_secret_env("TRELLIS_SERVER_KUBECONFIG")?,
		context: env_var("TRELLIS_SERVER_K8S_CONTEXT"),
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("TRELLIS_SERVER_LOG_LEVEL"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/config.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http]\nport = 9999\n\n[scm]\nprovider = \"gitlab\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9999));
		assert_eq!(layer.scm.unwrap().provider.as_deref(), Some("gitlab"));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http\nport = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}
}
