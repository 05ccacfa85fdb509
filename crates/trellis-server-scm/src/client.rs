// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::ScmResult;
use crate::types::{
	CreateIssueRequest, CreateRepositoryRequest, IssueRecord, RepositoryRecord, WorkflowRecord,
};

/// Capability set shared by every git host backend.
///
/// Implementations translate between the provider's REST representation and
/// the normalized records in [`crate::types`]. Nothing is cached or retried.
#[async_trait]
pub trait ScmClient: Send + Sync {
	/// Short provider name, used in logs and error messages.
	fn provider_name(&self) -> &'static str;

	/// List repositories, most recently updated first.
	///
	/// An empty `owner` lists everything visible to the authenticated token,
	/// private repositories included.
	async fn list_repositories(&self, owner: &str) -> ScmResult<Vec<RepositoryRecord>>;

	/// List CI workflow definitions. Zero workflows is an empty list.
	async fn list_workflows(&self, owner: &str, repo: &str) -> ScmResult<Vec<WorkflowRecord>>;

	/// Trigger a workflow run. No result payload.
	async fn dispatch_workflow(
		&self,
		owner: &str,
		repo: &str,
		workflow_file: &str,
		branch: &str,
		inputs: &serde_json::Map<String, serde_json::Value>,
	) -> ScmResult<()>;

	/// Create a repository owned by the authenticated identity.
	async fn create_repository(
		&self,
		request: &CreateRepositoryRequest,
	) -> ScmResult<RepositoryRecord>;

	/// Delete a repository. Deleting a missing repository is an error.
	async fn delete_repository(&self, owner: &str, repo: &str) -> ScmResult<()>;

	async fn create_issue(
		&self,
		owner: &str,
		repo: &str,
		request: &CreateIssueRequest,
	) -> ScmResult<IssueRecord>;

	async fn list_issues(&self, owner: &str, repo: &str) -> ScmResult<Vec<IssueRecord>>;
}
