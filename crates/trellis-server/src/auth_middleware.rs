// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer token middleware for Axum.
//!
//! Every request outside the [`Whitelist`](trellis_server_auth::Whitelist)
//! must carry `Authorization: Bearer <jwt>` signed with the server key. On
//! success the validated [`Claims`](trellis_server_auth::Claims) are stored as
//! a request extension.

use axum::{
	body::Body,
	extract::State,
	http::Request,
	middleware::Next,
	response::{IntoResponse, Response},
};
use trellis_server_auth::authenticate;

use crate::{api::AppState, error::ServerError};

pub async fn require_auth(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let path = request.uri().path();
	if state.auth.whitelist.is_whitelisted(path) {
		return next.run(request).await;
	}

	match authenticate(request.headers(), &state.auth.signing_key) {
		Ok(claims) => {
			request.extensions_mut().insert(claims);
			next.run(request).await
		}
		Err(e) => {
			tracing::debug!(path = %request.uri().path(), error = %e, "rejected request");
			ServerError::from(e).into_response()
		}
	}
}
