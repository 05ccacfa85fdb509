// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for trellis-server.
//!
//! The interactive UI is served at `/swagger` and the raw JSON document at
//! `/api-docs/openapi.json`.

use utoipa::{
	openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
	Modify, OpenApi,
};

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trellis Server API",
        version = "1.0.0",
        description = "Backend for frontend over git hosting providers, a user store and Kubernetes pod inspection.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "auth", description = "Bearer token issuance"),
        (name = "github", description = "Repositories, workflows and issues on the configured git provider"),
        (name = "users", description = "User CRUD with soft delete"),
        (name = "k8s", description = "Read-only pod inspection")
    ),
    paths(
        routes::health::health_check,
        routes::login::login,
        routes::scm::list_own_repositories,
        routes::scm::list_repositories,
        routes::scm::create_repository,
        routes::scm::list_workflows,
        routes::scm::delete_repository,
        routes::scm::dispatch_workflow,
        routes::scm::list_issues,
        routes::scm::create_issue,
        routes::users::list_users,
        routes::users::get_user,
        routes::users::create_user,
        routes::users::update_user,
        routes::users::delete_user,
        routes::k8s::list_pods,
        routes::k8s::pod_events,
        routes::k8s::pod_logs,
        routes::k8s::describe_pod,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            routes::MessageResponse,
            routes::login::TokenResponse,
            trellis_server_scm::RepositoryRecord,
            trellis_server_scm::WorkflowRecord,
            trellis_server_scm::IssueRecord,
            trellis_server_scm::CreateRepositoryRequest,
            trellis_server_scm::CreateIssueRequest,
            trellis_server_scm::DispatchWorkflowRequest,
            trellis_server_db::User,
            trellis_server_db::NewUser,
            trellis_server_db::UserPatch,
            trellis_server_k8s::PodSummary,
            trellis_server_k8s::PodEvent,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` JWT scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"bearer_auth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("JWT")
					.build(),
			),
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_document_lists_routes_and_scheme() {
		let doc = ApiDoc::openapi();
		assert!(doc.paths.paths.contains_key("/api/v1/user/{id}"));
		assert!(doc.paths.paths.contains_key("/api/v1/k8s/{namespace}/pods"));
		let components = doc.components.expect("components");
		assert!(components.security_schemes.contains_key("bearer_auth"));
	}
}
