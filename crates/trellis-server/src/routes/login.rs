// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Token issuance.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use trellis_server_auth::issue_token;
use utoipa::ToSchema;

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
	/// HS256 JWT valid for 72 hours.
	pub token: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/login",
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 500, description = "Signing key unavailable", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
/// GET /api/v1/login - Issue a signed bearer token.
#[tracing::instrument(skip(state))]
pub async fn login(
	State(state): State<AppState>,
) -> Result<(StatusCode, Json<TokenResponse>), ServerError> {
	let token = issue_token(&state.auth.signing_key)?;
	tracing::info!("issued bearer token");
	Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
