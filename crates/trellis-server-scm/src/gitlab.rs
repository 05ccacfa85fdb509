// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitLab REST client (API v4).
//!
//! GitLab has no equivalent of GitHub Actions workflow dispatch here, so
//! [`ScmClient::list_workflows`] returns an empty list and
//! [`ScmClient::dispatch_workflow`] succeeds without calling the API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use trellis_common_secret::SecretString;
use trellis_server_config::ScmConfig;

use crate::client::ScmClient;
use crate::error::{ScmError, ScmResult};
use crate::http::{build_http_client, join, parse_base_url, read_json, segment, send};
use crate::types::{
	CreateIssueRequest, CreateRepositoryRequest, IssueRecord, RepositoryRecord, WorkflowRecord,
};

const PROVIDER: &str = "GitLab";
const PAGE_SIZE: &str = "100";

pub struct GitLabClient {
	http_client: Client,
	base_url: Url,
	token: Option<SecretString>,
}

impl std::fmt::Debug for GitLabClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GitLabClient")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.finish()
	}
}

impl GitLabClient {
	pub fn new(base_url: &str, token: Option<SecretString>, timeout_secs: u64) -> ScmResult<Self> {
		Ok(Self {
			http_client: build_http_client(timeout_secs)?,
			base_url: parse_base_url(base_url)?,
			token,
		})
	}

	pub fn from_config(config: &ScmConfig) -> ScmResult<Self> {
		Self::new(
			&config.gitlab_base_url,
			config.gitlab_token.clone(),
			config.timeout_secs,
		)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		let request = self.http_client.request(method, url);
		match &self.token {
			Some(token) => request.header("PRIVATE-TOKEN", token.expose().as_str()),
			None => request,
		}
	}

	/// `projects/{owner%2Frepo}{rest}`
	fn project_url(&self, owner: &str, repo: &str, rest: &str) -> ScmResult<Url> {
		join(
			&self.base_url,
			&format!("projects/{}{rest}", segment(&format!("{owner}/{repo}"))),
		)
	}

	async fn resolve_user_id(&self, username: &str) -> ScmResult<i64> {
		let url = join(&self.base_url, "users")?;
		let request = self
			.request(Method::GET, url)
			.query(&[("username", username)]);
		let users: Vec<GlUser> = read_json(PROVIDER, send(PROVIDER, request).await?).await?;
		users
			.into_iter()
			.next()
			.map(|u| u.id)
			.ok_or_else(|| ScmError::NotFound(format!("GitLab user '{username}'")))
	}
}

#[derive(Debug, Deserialize)]
struct GlProject {
	id: i64,
	name: String,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	visibility: Option<String>,
}

impl From<GlProject> for RepositoryRecord {
	fn from(project: GlProject) -> Self {
		let is_private = matches!(
			project.visibility.as_deref(),
			Some("private") | Some("internal")
		);
		Self {
			name: project.name,
			description: project.description.unwrap_or_default(),
			is_private,
			id: project.id.to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct GlUser {
	id: i64,
}

#[derive(Debug, Deserialize)]
struct GlAssignee {
	username: String,
}

#[derive(Debug, Deserialize)]
struct GlIssue {
	title: String,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	labels: Vec<String>,
	#[serde(default)]
	assignee: Option<GlAssignee>,
}

impl GlIssue {
	fn into_record(self, owner: &str, repo: &str) -> IssueRecord {
		IssueRecord {
			title: self.title,
			body: self.description.unwrap_or_default(),
			labels: self.labels,
			assignee: self.assignee.map(|a| a.username).unwrap_or_default(),
			owner: owner.to_string(),
			repo: repo.to_string(),
		}
	}
}

#[derive(Debug, Serialize)]
struct GlCreateProject<'a> {
	name: &'a str,
	description: &'a str,
	visibility: &'static str,
	initialize_with_readme: bool,
}

#[derive(Debug, Serialize)]
struct GlCreateIssue<'a> {
	title: &'a str,
	description: &'a str,
	/// Comma separated, in request order.
	labels: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	assignee_ids: Vec<i64>,
}

#[async_trait]
impl ScmClient for GitLabClient {
	fn provider_name(&self) -> &'static str {
		PROVIDER
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn list_repositories(&self, owner: &str) -> ScmResult<Vec<RepositoryRecord>> {
		let (url, owned) = if owner.is_empty() {
			(join(&self.base_url, "projects")?, true)
		} else {
			(
				join(&self.base_url, &format!("users/{}/projects", segment(owner)))?,
				false,
			)
		};
		debug!(url = %url, "Listing projects");

		let mut request = self.request(Method::GET, url).query(&[
			("order_by", "updated_at"),
			("sort", "desc"),
			("per_page", PAGE_SIZE),
		]);
		if owned {
			request = request.query(&[("owned", "true")]);
		}

		let projects: Vec<GlProject> = read_json(PROVIDER, send(PROVIDER, request).await?).await?;
		Ok(projects.into_iter().map(RepositoryRecord::from).collect())
	}

	async fn list_workflows(&self, _owner: &str, _repo: &str) -> ScmResult<Vec<WorkflowRecord>> {
		Ok(Vec::new())
	}

	async fn dispatch_workflow(
		&self,
		owner: &str,
		repo: &str,
		workflow_file: &str,
		_branch: &str,
		_inputs: &serde_json::Map<String, serde_json::Value>,
	) -> ScmResult<()> {
		debug!(owner, repo, workflow_file, "GitLab has no workflow dispatch, ignoring");
		Ok(())
	}

	#[instrument(skip(self, request), fields(provider = PROVIDER, name = %request.name))]
	async fn create_repository(
		&self,
		request: &CreateRepositoryRequest,
	) -> ScmResult<RepositoryRecord> {
		let url = join(&self.base_url, "projects")?;
		let body = GlCreateProject {
			name: &request.name,
			description: &request.description,
			visibility: if request.is_private {
				"private"
			} else {
				"public"
			},
			initialize_with_readme: request.is_auto_int,
		};
		let project: GlProject =
			read_json(PROVIDER, send(PROVIDER, self.request(Method::POST, url).json(&body)).await?)
				.await?;
		Ok(project.into())
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn delete_repository(&self, owner: &str, repo: &str) -> ScmResult<()> {
		let url = self.project_url(owner, repo, "")?;
		send(PROVIDER, self.request(Method::DELETE, url)).await?;
		Ok(())
	}

	#[instrument(skip(self, request), fields(provider = PROVIDER))]
	async fn create_issue(
		&self,
		owner: &str,
		repo: &str,
		request: &CreateIssueRequest,
	) -> ScmResult<IssueRecord> {
		let assignee_ids = if request.assignee.is_empty() {
			Vec::new()
		} else {
			vec![self.resolve_user_id(&request.assignee).await?]
		};

		let url = self.project_url(owner, repo, "/issues")?;
		let body = GlCreateIssue {
			title: &request.title,
			description: &request.body,
			labels: request.labels.join(","),
			assignee_ids,
		};
		let issue: GlIssue =
			read_json(PROVIDER, send(PROVIDER, self.request(Method::POST, url).json(&body)).await?)
				.await?;
		Ok(issue.into_record(owner, repo))
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn list_issues(&self, owner: &str, repo: &str) -> ScmResult<Vec<IssueRecord>> {
		let url = self.project_url(owner, repo, "/issues")?;
		let request = self
			.request(Method::GET, url)
			.query(&[("per_page", PAGE_SIZE)]);
		let issues: Vec<GlIssue> = read_json(PROVIDER, send(PROVIDER, request).await?).await?;
		Ok(issues
			.into_iter()
			.map(|i| i.into_record(owner, repo))
			.collect())
	}
}
