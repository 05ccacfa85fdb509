// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User CRUD handlers.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	Json,
};
use trellis_server_db::{NewUser, User, UserPatch};

use super::{json_body, MessageResponse};
use crate::{api::AppState, error::ServerError};

/// Parse a `{id}` path segment as a positive user id.
fn parse_user_id(raw: &str) -> Result<i64, ServerError> {
	match raw.parse::<i64>() {
		Ok(id) if id > 0 => Ok(id),
		_ => Err(ServerError::BadRequest(format!("invalid user id: {raw}"))),
	}
}

fn user_not_found(id: i64) -> ServerError {
	ServerError::NotFound(format!("user {id} not found"))
}

#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "All users that are not deleted", body = Vec<User>),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
/// GET /api/v1/user - List users.
#[tracing::instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ServerError> {
	Ok(Json(state.users.list_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
/// GET /api/v1/user/{id} - Fetch one user.
#[tracing::instrument(skip(state))]
pub async fn get_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<User>, ServerError> {
	let id = parse_user_id(&id)?;
	state
		.users
		.get_user_by_id(id)
		.await?
		.map(Json)
		.ok_or_else(|| user_not_found(id))
}

#[utoipa::path(
    post,
    path = "/api/v1/user",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Malformed body or nothing inserted", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
/// POST /api/v1/user - Create a user.
#[tracing::instrument(skip(state, body))]
pub async fn create_user(
	State(state): State<AppState>,
	body: Result<Json<NewUser>, JsonRejection>,
) -> Result<StatusCode, ServerError> {
	let user = json_body(body)?;
	match state.users.create_user(&user).await? {
		1 => Ok(StatusCode::CREATED),
		count => {
			tracing::warn!(count, "unexpected insert count");
			Err(ServerError::BadRequest("user was not created".into()))
		}
	}
}

#[utoipa::path(
    put,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Invalid id or body", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
/// PUT /api/v1/user/{id} - Update the provided fields of a user.
#[tracing::instrument(skip(state, body))]
pub async fn update_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
	body: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
	let id = parse_user_id(&id)?;
	let patch = json_body(body)?;
	if state.users.update_user_by_id(id, &patch).await? == 0 {
		return Err(user_not_found(id));
	}
	Ok(Json(MessageResponse::new(format!("user {id} updated"))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "No such user", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
/// DELETE /api/v1/user/{id} - Soft-delete a user.
#[tracing::instrument(skip(state))]
pub async fn delete_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
	let id = parse_user_id(&id)?;
	if state.users.delete_user_by_id(id).await? == 0 {
		return Err(user_not_found(id));
	}
	Ok(Json(MessageResponse::new(format!("user {id} deleted"))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_parse_user_id() {
		assert_eq!(parse_user_id("1").unwrap(), 1);
		assert!(parse_user_id("0").is_err());
		assert!(parse_user_id("-4").is_err());
		assert!(parse_user_id("abc").is_err());
		assert!(parse_user_id("").is_err());
	}

	proptest! {
		#[test]
		fn positive_ids_round_trip(id in 1i64..i64::MAX) {
			prop_assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
		}

		#[test]
		fn non_numeric_ids_rejected(raw in "[a-z]{1,12}") {
			prop_assert!(parse_user_id(&raw).is_err());
		}
	}
}
