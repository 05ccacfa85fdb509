// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use axum::Json;

use super::MessageResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = MessageResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness check. Also served at `/`.
pub async fn health_check() -> Json<MessageResponse> {
	Json(MessageResponse::new("Server is up and running"))
}
