// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPool, sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{NewUser, User, UserPatch};

/// CRUD over user records, one implementation per SQL backend.
///
/// Soft-deleted users are invisible to every read.
#[async_trait]
pub trait UserStore: Send + Sync {
	fn backend_name(&self) -> &'static str;

	/// All live users ordered by id.
	async fn list_users(&self) -> Result<Vec<User>, DbError>;

	async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError>;

	/// Returns rows affected (0 or 1).
	async fn create_user(&self, user: &NewUser) -> Result<u64, DbError>;

	/// Soft delete. Returns rows affected.
	async fn delete_user_by_id(&self, id: i64) -> Result<u64, DbError>;

	/// Returns 0 without writing when the user does not exist.
	async fn update_user_by_id(&self, id: i64, patch: &UserPatch) -> Result<u64, DbError>;
}

// =============================================================================
// SQLite
// =============================================================================

#[derive(Clone)]
pub struct SqliteUserStore {
	pool: SqlitePool,
}

impl SqliteUserStore {
	/// Wrap a pool, creating the `users` table if it does not exist.
	pub async fn new(pool: SqlitePool) -> Result<Self, DbError> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS users (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				name TEXT NOT NULL,
				age INTEGER NOT NULL DEFAULT 0,
				birthday TEXT,
				created_at TEXT NOT NULL,
				updated_at TEXT NOT NULL,
				deleted_at TEXT
			)
			"#,
		)
		.execute(&pool)
		.await?;

		Ok(Self { pool })
	}
}

#[async_trait]
impl UserStore for SqliteUserStore {
	fn backend_name(&self) -> &'static str {
		"sqlite"
	}

	#[tracing::instrument(skip(self))]
	async fn list_users(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, name, age, birthday, created_at, updated_at, deleted_at
			FROM users
			WHERE deleted_at IS NULL
			ORDER BY id ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user_sqlite).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = id))]
	async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, age, birthday, created_at, updated_at, deleted_at
			FROM users
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user_sqlite(&r)).transpose()
	}

	#[tracing::instrument(skip(self, user), fields(name = %user.name))]
	async fn create_user(&self, user: &NewUser) -> Result<u64, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT INTO users (name, age, birthday, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(&user.name)
		.bind(user.age)
		.bind(user.birthday.map(|b| b.to_rfc3339()))
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self), fields(user_id = id))]
	async fn delete_user_by_id(&self, id: i64) -> Result<u64, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE users
			SET deleted_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(&now)
		.bind(id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self, patch), fields(user_id = id))]
	async fn update_user_by_id(&self, id: i64, patch: &UserPatch) -> Result<u64, DbError> {
		if self.get_user_by_id(id).await?.is_none() {
			tracing::debug!("user not found, skipping update");
			return Ok(0);
		}

		let result = sqlx::query(
			r#"
			UPDATE users
			SET name = COALESCE(?, name),
				age = COALESCE(?, age),
				birthday = COALESCE(?, birthday),
				updated_at = ?
			WHERE id = ? AND deleted_at IS NULL
			"#,
		)
		.bind(patch.name.as_deref())
		.bind(patch.age)
		.bind(patch.birthday.map(|b| b.to_rfc3339()))
		.bind(Utc::now().to_rfc3339())
		.bind(id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|d| d.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Bad timestamp '{value}': {e}")))
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let birthday: Option<String> = row.try_get("birthday")?;
	let created_at: String = row.try_get("created_at")?;
	let updated_at: String = row.try_get("updated_at")?;
	let deleted_at: Option<String> = row.try_get("deleted_at")?;

	Ok(User {
		id: row.try_get("id")?,
		name: row.try_get("name")?,
		age: row.try_get("age")?,
		birthday: birthday.as_deref().map(parse_ts).transpose()?,
		created_at: parse_ts(&created_at)?,
		updated_at: parse_ts(&updated_at)?,
		deleted_at: deleted_at.as_deref().map(parse_ts).transpose()?,
	})
}

// =============================================================================
// Postgres
// =============================================================================

#[derive(Clone)]
pub struct PostgresUserStore {
	pool: PgPool,
}

impl PostgresUserStore {
	/// Wrap a pool, creating the `users` table if it does not exist.
	pub async fn new(pool: PgPool) -> Result<Self, DbError> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS users (
				id BIGSERIAL PRIMARY KEY,
				name TEXT NOT NULL,
				age INTEGER NOT NULL DEFAULT 0,
				birthday TIMESTAMPTZ,
				created_at TIMESTAMPTZ NOT NULL,
				updated_at TIMESTAMPTZ NOT NULL,
				deleted_at TIMESTAMPTZ
			)
			"#,
		)
		.execute(&pool)
		.await?;

		Ok(Self { pool })
	}
}

#[async_trait]
impl UserStore for PostgresUserStore {
	fn backend_name(&self) -> &'static str {
		"postgres"
	}

	#[tracing::instrument(skip(self))]
	async fn list_users(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, name, age, birthday, created_at, updated_at, deleted_at
			FROM users
			WHERE deleted_at IS NULL
			ORDER BY id ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user_pg).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = id))]
	async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, age, birthday, created_at, updated_at, deleted_at
			FROM users
			WHERE id = $1 AND deleted_at IS NULL
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user_pg(&r)).transpose()
	}

	#[tracing::instrument(skip(self, user), fields(name = %user.name))]
	async fn create_user(&self, user: &NewUser) -> Result<u64, DbError> {
		let now = Utc::now();
		let result = sqlx::query(
			r#"
			INSERT INTO users (name, age, birthday, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $4)
			"#,
		)
		.bind(&user.name)
		.bind(user.age)
		.bind(user.birthday)
		.bind(now)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self), fields(user_id = id))]
	async fn delete_user_by_id(&self, id: i64) -> Result<u64, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users
			SET deleted_at = $1
			WHERE id = $2 AND deleted_at IS NULL
			"#,
		)
		.bind(Utc::now())
		.bind(id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self, patch), fields(user_id = id))]
	async fn update_user_by_id(&self, id: i64, patch: &UserPatch) -> Result<u64, DbError> {
		if self.get_user_by_id(id).await?.is_none() {
			tracing::debug!("user not found, skipping update");
			return Ok(0);
		}

		let result = sqlx::query(
			r#"
			UPDATE users
			SET name = COALESCE($1, name),
				age = COALESCE($2, age),
				birthday = COALESCE($3, birthday),
				updated_at = $4
			WHERE id = $5 AND deleted_at IS NULL
			"#,
		)
		.bind(patch.name.as_deref())
		.bind(patch.age)
		.bind(patch.birthday)
		.bind(Utc::now())
		.bind(id)
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected())
	}
}

fn row_to_user_pg(row: &sqlx::postgres::PgRow) -> Result<User, DbError> {
	Ok(User {
		id: row.try_get("id")?,
		name: row.try_get("name")?,
		age: row.try_get("age")?,
		birthday: row.try_get("birthday")?,
		created_at: row.try_get("created_at")?,
		updated_at: row.try_get("updated_at")?,
		deleted_at: row.try_get("deleted_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	async fn make_store() -> SqliteUserStore {
		let pool = crate::testing::create_test_pool().await;
		SqliteUserStore::new(pool).await.unwrap()
	}

	fn new_user(name: &str, age: i32) -> NewUser {
		NewUser {
			name: name.to_string(),
			age,
			birthday: None,
		}
	}

	#[tokio::test]
	async fn test_create_and_get_user() {
		let store = make_store().await;

		assert_eq!(store.create_user(&new_user("a", 38)).await.unwrap(), 1);

		let fetched = store.get_user_by_id(1).await.unwrap().unwrap();
		assert_eq!(fetched.id, 1);
		assert_eq!(fetched.name, "a");
		assert_eq!(fetched.age, 38);
		assert!(fetched.deleted_at.is_none());
	}

	#[tokio::test]
	async fn test_get_missing_user_is_none() {
		let store = make_store().await;
		assert!(store.get_user_by_id(42).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_list_users_ordered_by_id() {
		let store = make_store().await;
		for name in ["c", "a", "b"] {
			store.create_user(&new_user(name, 1)).await.unwrap();
		}

		let users = store.list_users().await.unwrap();
		let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
		assert_eq!(ids, vec![1, 2, 3]);
		assert_eq!(users[0].name, "c");
	}

	#[tokio::test]
	async fn test_soft_delete_hides_user() {
		let store = make_store().await;
		store.create_user(&new_user("a", 38)).await.unwrap();

		assert_eq!(store.delete_user_by_id(1).await.unwrap(), 1);
		assert!(store.get_user_by_id(1).await.unwrap().is_none());
		assert!(store.list_users().await.unwrap().is_empty());
		assert_eq!(store.delete_user_by_id(1).await.unwrap(), 0);

		let (deleted_at,): (Option<String>,) =
			sqlx::query_as("SELECT deleted_at FROM users WHERE id = 1")
				.fetch_one(&store.pool)
				.await
				.unwrap();
		assert!(deleted_at.is_some());
	}

	#[tokio::test]
	async fn test_update_missing_user_returns_zero() {
		let store = make_store().await;
		let patch = UserPatch {
			name: Some("x".to_string()),
			..Default::default()
		};
		assert_eq!(store.update_user_by_id(7, &patch).await.unwrap(), 0);
		assert!(store.list_users().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_keeps_absent_fields() {
		let store = make_store().await;
		let birthday = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
			.unwrap()
			.with_timezone(&Utc);
		store
			.create_user(&NewUser {
				name: "a".to_string(),
				age: 38,
				birthday: Some(birthday),
			})
			.await
			.unwrap();

		let patch = UserPatch {
			age: Some(39),
			..Default::default()
		};
		assert_eq!(store.update_user_by_id(1, &patch).await.unwrap(), 1);

		let user = store.get_user_by_id(1).await.unwrap().unwrap();
		assert_eq!(user.name, "a");
		assert_eq!(user.age, 39);
		assert_eq!(user.birthday, Some(birthday));
		assert!(user.updated_at >= user.created_at);
	}

	#[tokio::test]
	async fn test_update_after_delete_returns_zero() {
		let store = make_store().await;
		store.create_user(&new_user("a", 1)).await.unwrap();
		store.delete_user_by_id(1).await.unwrap();

		let patch = UserPatch {
			age: Some(2),
			..Default::default()
		};
		assert_eq!(store.update_user_by_id(1, &patch).await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_schema_creation_is_idempotent() {
		let pool = crate::testing::create_test_pool().await;
		let first = SqliteUserStore::new(pool.clone()).await.unwrap();
		first.create_user(&new_user("kept", 1)).await.unwrap();

		let second = SqliteUserStore::new(pool).await.unwrap();
		assert_eq!(second.list_users().await.unwrap().len(), 1);
	}

	/// Runs only when `TRELLIS_TEST_POSTGRES_URL` points at a scratch database.
	#[tokio::test]
	async fn test_postgres_round_trip() {
		let Ok(url) = std::env::var("TRELLIS_TEST_POSTGRES_URL") else {
			return;
		};
		let pool = PgPool::connect(&url).await.unwrap();
		let store = PostgresUserStore::new(pool).await.unwrap();

		let name = format!("pg-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
		assert_eq!(store.create_user(&new_user(&name, 38)).await.unwrap(), 1);

		let created = store
			.list_users()
			.await
			.unwrap()
			.into_iter()
			.find(|u| u.name == name)
			.unwrap();
		assert_eq!(created.age, 38);

		let patch = UserPatch {
			age: Some(40),
			..Default::default()
		};
		assert_eq!(store.update_user_by_id(created.id, &patch).await.unwrap(), 1);
		assert_eq!(
			store.get_user_by_id(created.id).await.unwrap().unwrap().age,
			40
		);

		assert_eq!(store.delete_user_by_id(created.id).await.unwrap(), 1);
		assert!(store.get_user_by_id(created.id).await.unwrap().is_none());
	}
}
