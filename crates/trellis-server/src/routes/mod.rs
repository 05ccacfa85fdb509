// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

pub mod health;
pub mod k8s;
pub mod login;
pub mod scm;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ServerError;

/// `{"data": "..."}` envelope for plain acknowledgements.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
	pub data: String,
}

impl MessageResponse {
	pub fn new(data: impl Into<String>) -> Self {
		Self { data: data.into() }
	}
}

/// Unwrap a JSON body, turning any rejection into a 400.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
	body
		.map(|Json(value)| value)
		.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}
