// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use trellis_server_auth::AuthError;
use trellis_server_db::DbError;
use trellis_server_k8s::K8sError;
use trellis_server_scm::ScmError;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Malformed path parameter or body.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	#[error("Not found: {0}")]
	NotFound(String),

	/// Git host call failed.
	#[error("Git provider error: {0}")]
	Scm(#[from] ScmError),

	/// Cluster API call failed.
	#[error("Cluster error: {0}")]
	K8s(#[from] K8sError),

	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Auth error: {0}")]
	Auth(#[from] AuthError),
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("bad_request", msg.clone()),
			),
			ServerError::NotFound(msg) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new("not_found", msg.clone()),
			),
			ServerError::Scm(e) => {
				tracing::warn!(error = %e, "git provider error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("provider_error", e.to_string()),
				)
			}
			ServerError::K8s(K8sError::Disabled) => (
				StatusCode::SERVICE_UNAVAILABLE,
				ErrorResponse::new("service_unavailable", K8sError::Disabled.to_string()),
			),
			ServerError::K8s(e) => {
				tracing::warn!(error = %e, "cluster error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("provider_error", e.to_string()),
				)
			}
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", e.to_string()),
				)
			}
			ServerError::Auth(AuthError::MissingSigningKey | AuthError::Signing(_)) => {
				tracing::error!(error = %self, "token signing unavailable");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "Token signing is not available"),
				)
			}
			ServerError::Auth(e) => (
				StatusCode::UNAUTHORIZED,
				ErrorResponse::new("unauthorized", e.to_string()),
			),
		};

		(status, Json(body)).into_response()
	}
}
