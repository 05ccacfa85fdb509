// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Git hosting handlers. The configured provider (GitHub or GitLab) serves
//! every route under `/api/v1/github`.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	Json,
};
use trellis_server_scm::{
	CreateIssueRequest, CreateRepositoryRequest, DispatchWorkflowRequest, IssueRecord,
	RepositoryRecord, WorkflowRecord,
};

use super::{json_body, MessageResponse};
use crate::{api::AppState, error::ServerError};

#[utoipa::path(
    get,
    path = "/api/v1/github",
    responses(
        (status = 200, description = "Repositories visible to the authenticated identity", body = Vec<RepositoryRecord>),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// GET /api/v1/github - List repositories of the authenticated identity.
#[tracing::instrument(skip(state))]
pub async fn list_own_repositories(
	State(state): State<AppState>,
) -> Result<Json<Vec<RepositoryRecord>>, ServerError> {
	Ok(Json(state.scm.list_repositories("").await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/github/{owner}",
    params(("owner" = String, Path, description = "User or organization")),
    responses(
        (status = 200, description = "Repositories of the owner", body = Vec<RepositoryRecord>),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// GET /api/v1/github/{owner} - List an owner's repositories.
#[tracing::instrument(skip(state))]
pub async fn list_repositories(
	State(state): State<AppState>,
	Path(owner): Path<String>,
) -> Result<Json<Vec<RepositoryRecord>>, ServerError> {
	Ok(Json(state.scm.list_repositories(&owner).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/github/{owner}",
    params(("owner" = String, Path, description = "Ignored; repositories are created for the authenticated identity")),
    request_body = CreateRepositoryRequest,
    responses(
        (status = 201, description = "Repository created", body = RepositoryRecord),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// POST /api/v1/github/{owner} - Create a repository.
#[tracing::instrument(skip(state, body))]
pub async fn create_repository(
	State(state): State<AppState>,
	Path(owner): Path<String>,
	body: Result<Json<CreateRepositoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RepositoryRecord>), ServerError> {
	let request = json_body(body)?;
	if request.name.trim().is_empty() {
		return Err(ServerError::BadRequest("repository name is required".into()));
	}
	let record = state.scm.create_repository(&request).await?;
	tracing::info!(repo = %record.name, "repository created");
	Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/github/{owner}/{repo}",
    params(
        ("owner" = String, Path, description = "User or organization"),
        ("repo" = String, Path, description = "Repository name")
    ),
    responses(
        (status = 200, description = "Workflows of the repository", body = Vec<WorkflowRecord>),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// GET /api/v1/github/{owner}/{repo} - List CI workflows.
#[tracing::instrument(skip(state))]
pub async fn list_workflows(
	State(state): State<AppState>,
	Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<Vec<WorkflowRecord>>, ServerError> {
	Ok(Json(state.scm.list_workflows(&owner, &repo).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/github/{owner}/{repo}",
    params(
        ("owner" = String, Path, description = "User or organization"),
        ("repo" = String, Path, description = "Repository name")
    ),
    responses(
        (status = 200, description = "Repository deleted", body = MessageResponse),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// DELETE /api/v1/github/{owner}/{repo} - Delete a repository.
#[tracing::instrument(skip(state))]
pub async fn delete_repository(
	State(state): State<AppState>,
	Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ServerError> {
	state.scm.delete_repository(&owner, &repo).await?;
	tracing::info!("repository deleted");
	Ok(Json(MessageResponse::new(format!("{repo} delete success"))))
}

#[utoipa::path(
    post,
    path = "/api/v1/dispatch/{owner}/{repo}",
    params(
        ("owner" = String, Path, description = "User or organization"),
        ("repo" = String, Path, description = "Repository name")
    ),
    request_body = DispatchWorkflowRequest,
    responses(
        (status = 204, description = "Workflow run requested"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// POST /api/v1/dispatch/{owner}/{repo} - Trigger a workflow run.
#[tracing::instrument(skip(state, body))]
pub async fn dispatch_workflow(
	State(state): State<AppState>,
	Path((owner, repo)): Path<(String, String)>,
	body: Result<Json<DispatchWorkflowRequest>, JsonRejection>,
) -> Result<StatusCode, ServerError> {
	let request = json_body(body)?;
	state
		.scm
		.dispatch_workflow(
			&owner,
			&repo,
			&request.workflow_file,
			&request.branch,
			&request.inputs,
		)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/github/issue/{owner}/{repo}",
    params(
        ("owner" = String, Path, description = "User or organization"),
        ("repo" = String, Path, description = "Repository name")
    ),
    responses(
        (status = 200, description = "Issues of the repository", body = Vec<IssueRecord>),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// GET /api/v1/github/issue/{owner}/{repo} - List issues.
#[tracing::instrument(skip(state))]
pub async fn list_issues(
	State(state): State<AppState>,
	Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<Vec<IssueRecord>>, ServerError> {
	Ok(Json(state.scm.list_issues(&owner, &repo).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/github/issue/{owner}/{repo}",
    params(
        ("owner" = String, Path, description = "User or organization"),
        ("repo" = String, Path, description = "Repository name")
    ),
    request_body = CreateIssueRequest,
    responses(
        (status = 201, description = "Issue created", body = IssueRecord),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 500, description = "Provider error", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "github"
)]
/// POST /api/v1/github/issue/{owner}/{repo} - Open an issue.
#[tracing::instrument(skip(state, body))]
pub async fn create_issue(
	State(state): State<AppState>,
	Path((owner, repo)): Path<(String, String)>,
	body: Result<Json<CreateIssueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueRecord>), ServerError> {
	let request = json_body(body)?;
	let issue = state.scm.create_issue(&owner, &repo, &request).await?;
	Ok((StatusCode::CREATED, Json(issue)))
}
