// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.
//!
//! The user store runs on either an embedded SQLite file or a networked
//! Postgres server. The backend is chosen once at startup.

use serde::Deserialize;
use trellis_common_secret::SecretString;

const DEFAULT_SQLITE_URL: &str = "sqlite:./trellis.db";

/// Which SQL backend holds user records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
	#[default]
	Sqlite,
	#[serde(alias = "postgresql")]
	Postgres,
}

impl DatabaseBackend {
	/// Parse a backend name; anything unrecognised is `None`.
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"sqlite" | "sqlite3" => Some(Self::Sqlite),
			"postgres" | "postgresql" | "pg" => Some(Self::Postgres),
			_ => None,
		}
	}
}

impl std::fmt::Display for DatabaseBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Sqlite => f.write_str("sqlite"),
			Self::Postgres => f.write_str("postgres"),
		}
	}
}

/// Postgres connection parameters (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct PostgresConfig {
	pub host: String,
	pub port: u16,
	pub dbname: String,
	pub user: String,
	pub password: Option<SecretString>,
	/// libpq-style mode: disable, allow, prefer, require, verify-ca, verify-full.
	pub sslmode: String,
	pub timezone: String,
}

impl Default for PostgresConfig {
	fn default() -> Self {
		PostgresConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgresConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub dbname: Option<String>,
	#[serde(default)]
	pub user: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub sslmode: Option<String>,
	#[serde(default)]
	pub timezone: Option<String>,
}

impl PostgresConfigLayer {
	pub fn merge(&mut self, other: PostgresConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.dbname.is_some() {
			self.dbname = other.dbname;
		}
		if other.user.is_some() {
			self.user = other.user;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.sslmode.is_some() {
			self.sslmode = other.sslmode;
		}
		if other.timezone.is_some() {
			self.timezone = other.timezone;
		}
	}

	pub fn finalize(self) -> PostgresConfig {
		PostgresConfig {
			host: self.host.unwrap_or_else(|| "localhost".to_string()),
			port: self.port.unwrap_or(5432),
			dbname: self.dbname.unwrap_or_else(|| "postgres".to_string()),
			user: self.user.unwrap_or_else(|| "postgres".to_string()),
			password: self.password,
			sslmode: self.sslmode.unwrap_or_else(|| "disable".to_string()),
			timezone: self.timezone.unwrap_or_else(|| "UTC".to_string()),
		}
	}
}

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub backend: DatabaseBackend,
	/// SQLite connection string, used when `backend` is sqlite.
	pub url: String,
	pub postgres: PostgresConfig,
	pub max_connections: u32,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfigLayer::default().finalize()
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub backend: Option<DatabaseBackend>,
	#[serde(default, alias = "sqlite_url")]
	pub url: Option<String>,
	#[serde(default)]
	pub postgres: Option<PostgresConfigLayer>,
	#[serde(default)]
	pub max_connections: Option<u32>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.url.is_some() {
			self.url = other.url;
		}
		crate::layer::merge_option(
			&mut self.postgres,
			other.postgres,
			PostgresConfigLayer::merge,
		);
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			backend: self.backend.unwrap_or_default(),
			url: self.url.unwrap_or_else(|| DEFAULT_SQLITE_URL.to_string()),
			postgres: self.postgres.unwrap_or_default().finalize(),
			max_connections: self.max_connections.unwrap_or(5),
		}
	}
}
