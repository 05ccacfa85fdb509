// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User persistence for the Trellis server.
//!
//! One [`UserStore`] trait, implemented for SQLite and Postgres. The backend
//! is picked from [`DatabaseConfig`] by [`connect_user_store`] and held for
//! the life of the process.

pub mod error;
pub mod pool;
pub mod types;
pub mod user;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use trellis_server_config::{DatabaseBackend, DatabaseConfig};

pub use error::{DbError, Result};
pub use pool::{create_pg_pool, create_pool, pg_connect_options};
pub use types::{NewUser, User, UserPatch};
pub use user::{PostgresUserStore, SqliteUserStore, UserStore};

/// Connect to the configured backend and make sure the schema exists.
#[tracing::instrument(skip(config), fields(backend = %config.backend))]
pub async fn connect_user_store(config: &DatabaseConfig) -> Result<Arc<dyn UserStore>> {
	let store: Arc<dyn UserStore> = match config.backend {
		DatabaseBackend::Sqlite => {
			let pool = create_pool(&config.url, config.max_connections).await?;
			Arc::new(SqliteUserStore::new(pool).await?)
		}
		DatabaseBackend::Postgres => {
			let pool = create_pg_pool(&config.postgres, config.max_connections).await?;
			Arc::new(PostgresUserStore::new(pool).await?)
		}
	};

	tracing::info!(backend = store.backend_name(), "user store ready");
	Ok(store)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_connect_sqlite_from_config() {
		let dir = tempfile::tempdir().unwrap();
		let config = DatabaseConfig {
			url: format!("sqlite:{}?mode=rwc", dir.path().join("users.db").display()),
			..DatabaseConfig::default()
		};

		let store = connect_user_store(&config).await.unwrap();
		assert_eq!(store.backend_name(), "sqlite");
		store
			.create_user(&NewUser {
				name: "a".to_string(),
				age: 38,
				birthday: None,
			})
			.await
			.unwrap();
		assert_eq!(store.get_user_by_id(1).await.unwrap().unwrap().age, 38);
	}
}
