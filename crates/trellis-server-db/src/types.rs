// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: i64,
	pub name: String,
	pub age: i32,
	pub birthday: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub deleted_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/v1/user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
	pub name: String,
	#[serde(default)]
	pub age: i32,
	#[serde(default)]
	pub birthday: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/v1/user/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserPatch {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub age: Option<i32>,
	#[serde(default)]
	pub birthday: Option<DateTime<Utc>>,
}
