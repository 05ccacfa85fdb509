// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::{get, post},
	Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use trellis_common_secret::SecretString;
use trellis_server_auth::Whitelist;
use trellis_server_config::ServerConfig;
use trellis_server_db::UserStore;
use trellis_server_k8s::{ClusterInspector, KubeClient};
use trellis_server_scm::ScmClient;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{api_docs::ApiDoc, auth_middleware::require_auth, error::ServerError, routes};

/// Signing key used when a non-production server starts without one.
const DEV_SIGNING_KEY: &str = "trellis-development-signing-key";

/// Token validation inputs shared by the auth layer and the login route.
pub struct AuthState {
	pub signing_key: SecretString,
	pub whitelist: Whitelist,
}

#[derive(Clone)]
pub struct AppState {
	pub scm: Arc<dyn ScmClient>,
	pub users: Arc<dyn UserStore>,
	/// `None` when cluster inspection is disabled or the client failed to build.
	pub cluster: Option<ClusterInspector>,
	pub auth: Arc<AuthState>,
}

/// Build the application state from resolved configuration.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let scm = trellis_server_scm::create_scm_client(&config.scm)?;
	tracing::info!(provider = scm.provider_name(), "git provider configured");

	let users = trellis_server_db::connect_user_store(&config.database).await?;
	tracing::info!(backend = users.backend_name(), "user store ready");

	let cluster = if config.kubernetes.enabled {
		match KubeClient::from_config(&config.kubernetes).await {
			Ok(client) => Some(ClusterInspector::new(Arc::new(client))),
			Err(e) => {
				tracing::error!(error = %e, "failed to create Kubernetes client");
				tracing::warn!("Continuing without cluster inspection support");
				None
			}
		}
	} else {
		None
	};

	let signing_key = match &config.auth.jwt_signing_key {
		Some(key) if !key.is_blank() => key.clone(),
		_ => {
			tracing::warn!(
				environment = %config.auth.environment,
				"no JWT signing key configured, using the development key"
			);
			SecretString::new(DEV_SIGNING_KEY.to_string())
		}
	};

	Ok(AppState {
		scm,
		users,
		cluster,
		auth: Arc::new(AuthState {
			signing_key,
			whitelist: Whitelist::default(),
		}),
	})
}

/// Create the router with every route, the docs UI and the auth layer.
pub fn create_router(state: AppState) -> Router {
	let api = Router::new()
		.route("/", get(routes::health::health_check))
		.route("/health", get(routes::health::health_check))
		.route("/api/v1/login", get(routes::login::login))
		.route("/api/v1/github", get(routes::scm::list_own_repositories))
		.route(
			"/api/v1/github/{owner}",
			get(routes::scm::list_repositories).post(routes::scm::create_repository),
		)
		.route(
			"/api/v1/github/{owner}/{repo}",
			get(routes::scm::list_workflows).delete(routes::scm::delete_repository),
		)
		.route(
			"/api/v1/dispatch/{owner}/{repo}",
			post(routes::scm::dispatch_workflow),
		)
		.route(
			"/api/v1/github/issue/{owner}/{repo}",
			get(routes::scm::list_issues).post(routes::scm::create_issue),
		)
		.route(
			"/api/v1/user",
			get(routes::users::list_users).post(routes::users::create_user),
		)
		.route(
			"/api/v1/user/{id}",
			get(routes::users::get_user)
				.put(routes::users::update_user)
				.delete(routes::users::delete_user),
		)
		.route("/api/v1/k8s/{namespace}/pods", get(routes::k8s::list_pods))
		.route(
			"/api/v1/k8s/{namespace}/pods/{pod}/events",
			get(routes::k8s::pod_events),
		)
		.route(
			"/api/v1/k8s/{namespace}/pods/{pod}/logs",
			get(routes::k8s::pod_logs),
		)
		.route(
			"/api/v1/k8s/{namespace}/pods/{pod}/describe",
			get(routes::k8s::describe_pod),
		)
		.with_state(state.clone());

	Router::new()
		.merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
		.merge(api)
		.layer(from_fn_with_state(state, require_auth))
		.layer(CatchPanicLayer::new())
}
