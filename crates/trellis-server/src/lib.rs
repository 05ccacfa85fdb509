// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Trellis HTTP server.
//!
//! Exposes the configured git provider, the user store and cluster inspection
//! behind JWT bearer authentication.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod error;
pub mod routes;

pub use api::{create_app_state, create_router, AppState, AuthState};
pub use api_docs::ApiDoc;
pub use error::{ErrorResponse, ServerError};
