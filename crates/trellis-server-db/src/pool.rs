// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use trellis_server_config::PostgresConfig;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./trellis.db")
/// * `max_connections` - upper bound on pooled connections
///
/// # Errors
/// Returns `DbError::Config` if the URL is invalid, `DbError::Sqlx` if the
/// connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Config(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!("sqlite pool created");
	Ok(pool)
}

/// Build Postgres connect options from discrete parameters.
///
/// The session time zone is applied through the startup `options` parameter.
pub fn pg_connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, DbError> {
	let ssl_mode = PgSslMode::from_str(&config.sslmode)
		.map_err(|e| DbError::Config(format!("Invalid sslmode '{}': {e}", config.sslmode)))?;

	let mut options = PgConnectOptions::new()
		.host(&config.host)
		.port(config.port)
		.database(&config.dbname)
		.username(&config.user)
		.ssl_mode(ssl_mode)
		.options([("timezone", config.timezone.as_str())]);

	if let Some(password) = &config.password {
		options = options.password(password.expose());
	}
	Ok(options)
}

#[tracing::instrument(skip(config), fields(host = %config.host, dbname = %config.dbname))]
pub async fn create_pg_pool(config: &PostgresConfig, max_connections: u32) -> Result<PgPool, DbError> {
	let options = pg_connect_options(config)?;
	let pool = PgPoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!("postgres pool created");
	Ok(pool)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pg_options_reject_bad_sslmode() {
		let config = PostgresConfig {
			sslmode: "sometimes".to_string(),
			..PostgresConfig::default()
		};
		assert!(matches!(pg_connect_options(&config), Err(DbError::Config(_))));
	}

	#[test]
	fn test_pg_options_from_config() {
		let config = PostgresConfig {
			host: "db.internal".to_string(),
			port: 6543,
			dbname: "trellis".to_string(),
			sslmode: "require".to_string(),
			..PostgresConfig::default()
		};
		let options = pg_connect_options(&config).unwrap();
		assert_eq!(options.get_host(), "db.internal");
		assert_eq!(options.get_port(), 6543);
		assert_eq!(options.get_database(), Some("trellis"));
	}

	#[tokio::test]
	async fn test_create_pool_on_disk() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}?mode=rwc", dir.path().join("t.db").display());
		let pool = create_pool(&url, 2).await.unwrap();
		let one: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
		assert_eq!(one.0, 1);
	}
}
