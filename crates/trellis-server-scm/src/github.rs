// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub REST client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use trellis_common_secret::SecretString;
use trellis_server_config::ScmConfig;

use crate::client::ScmClient;
use crate::error::ScmResult;
use crate::http::{build_http_client, join, parse_base_url, read_json, segment, send};
use crate::types::{
	CreateIssueRequest, CreateRepositoryRequest, IssueRecord, RepositoryRecord, WorkflowRecord,
};

const PROVIDER: &str = "GitHub";
const PAGE_SIZE: &str = "100";

/// Client for the GitHub REST API (v3, `2022-11-28`).
pub struct GitHubClient {
	http_client: Client,
	base_url: Url,
	token: Option<SecretString>,
}

impl std::fmt::Debug for GitHubClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GitHubClient")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.finish()
	}
}

impl GitHubClient {
	pub fn new(base_url: &str, token: Option<SecretString>, timeout_secs: u64) -> ScmResult<Self> {
		Ok(Self {
			http_client: build_http_client(timeout_secs)?,
			base_url: parse_base_url(base_url)?,
			token,
		})
	}

	pub fn from_config(config: &ScmConfig) -> ScmResult<Self> {
		Self::new(
			&config.github_base_url,
			config.github_token.clone(),
			config.timeout_secs,
		)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		let request = self
			.http_client
			.request(method, url)
			.header("Accept", "application/vnd.github+json")
			.header("X-GitHub-Api-Version", "2022-11-28");
		match &self.token {
			Some(token) => request.bearer_auth(token.expose()),
			None => request,
		}
	}

	fn repo_url(&self, owner: &str, repo: &str, rest: &str) -> ScmResult<Url> {
		join(
			&self.base_url,
			&format!("repos/{}/{}{rest}", segment(owner), segment(repo)),
		)
	}
}

#[derive(Debug, Deserialize)]
struct GhRepository {
	id: i64,
	name: String,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	private: bool,
}

impl From<GhRepository> for RepositoryRecord {
	fn from(repo: GhRepository) -> Self {
		Self {
			name: repo.name,
			description: repo.description.unwrap_or_default(),
			is_private: repo.private,
			id: repo.id.to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct GhWorkflowList {
	total_count: i64,
	#[serde(default)]
	workflows: Vec<GhWorkflow>,
}

#[derive(Debug, Deserialize)]
struct GhWorkflow {
	id: i64,
	name: String,
}

#[derive(Debug, Deserialize)]
struct GhLabel {
	name: String,
}

#[derive(Debug, Deserialize)]
struct GhUser {
	login: String,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
	title: String,
	#[serde(default)]
	body: Option<String>,
	#[serde(default)]
	labels: Vec<GhLabel>,
	#[serde(default)]
	assignee: Option<GhUser>,
	#[serde(default)]
	pull_request: Option<serde_json::Value>,
}

impl GhIssue {
	fn into_record(self, owner: &str, repo: &str) -> IssueRecord {
		IssueRecord {
			title: self.title,
			body: self.body.unwrap_or_default(),
			labels: self.labels.into_iter().map(|l| l.name).collect(),
			assignee: self.assignee.map(|u| u.login).unwrap_or_default(),
			owner: owner.to_string(),
			repo: repo.to_string(),
		}
	}
}

#[derive(Debug, Serialize)]
struct GhCreateRepository<'a> {
	name: &'a str,
	description: &'a str,
	private: bool,
	auto_init: bool,
}

#[derive(Debug, Serialize)]
struct GhCreateIssue<'a> {
	title: &'a str,
	body: &'a str,
	labels: &'a [String],
	#[serde(skip_serializing_if = "Vec::is_empty")]
	assignees: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct GhDispatch<'a> {
	#[serde(rename = "ref")]
	git_ref: &'a str,
	#[serde(skip_serializing_if = "no_inputs")]
	inputs: &'a serde_json::Map<String, serde_json::Value>,
}

fn no_inputs(inputs: &&serde_json::Map<String, serde_json::Value>) -> bool {
	inputs.is_empty()
}

#[async_trait]
impl ScmClient for GitHubClient {
	fn provider_name(&self) -> &'static str {
		PROVIDER
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn list_repositories(&self, owner: &str) -> ScmResult<Vec<RepositoryRecord>> {
		let url = if owner.is_empty() {
			join(&self.base_url, "user/repos")?
		} else {
			join(&self.base_url, &format!("users/{}/repos", segment(owner)))?
		};
		debug!(url = %url, "Listing repositories");

		let request = self.request(Method::GET, url).query(&[
			("type", "owner"),
			("sort", "updated"),
			("direction", "desc"),
			("per_page", PAGE_SIZE),
		]);
		let repos: Vec<GhRepository> = read_json(PROVIDER, send(PROVIDER, request).await?).await?;
		Ok(repos.into_iter().map(RepositoryRecord::from).collect())
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn list_workflows(&self, owner: &str, repo: &str) -> ScmResult<Vec<WorkflowRecord>> {
		let url = self.repo_url(owner, repo, "/actions/workflows")?;
		let list: GhWorkflowList =
			read_json(PROVIDER, send(PROVIDER, self.request(Method::GET, url)).await?).await?;

		if list.total_count == 0 {
			return Ok(Vec::new());
		}
		Ok(list
			.workflows
			.into_iter()
			.map(|w| WorkflowRecord {
				name: w.name,
				id: w.id,
			})
			.collect())
	}

	#[instrument(skip(self, inputs), fields(provider = PROVIDER))]
	async fn dispatch_workflow(
		&self,
		owner: &str,
		repo: &str,
		workflow_file: &str,
		branch: &str,
		inputs: &serde_json::Map<String, serde_json::Value>,
	) -> ScmResult<()> {
		let url = self.repo_url(
			owner,
			repo,
			&format!("/actions/workflows/{}/dispatches", segment(workflow_file)),
		)?;
		let body = GhDispatch {
			git_ref: branch,
			inputs,
		};
		send(PROVIDER, self.request(Method::POST, url).json(&body)).await?;
		debug!("Workflow dispatch accepted");
		Ok(())
	}

	#[instrument(skip(self, request), fields(provider = PROVIDER, name = %request.name))]
	async fn create_repository(
		&self,
		request: &CreateRepositoryRequest,
	) -> ScmResult<RepositoryRecord> {
		let url = join(&self.base_url, "user/repos")?;
		let body = GhCreateRepository {
			name: &request.name,
			description: &request.description,
			private: request.is_private,
			auto_init: request.is_auto_int,
		};
		let created: GhRepository =
			read_json(PROVIDER, send(PROVIDER, self.request(Method::POST, url).json(&body)).await?)
				.await?;
		Ok(created.into())
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn delete_repository(&self, owner: &str, repo: &str) -> ScmResult<()> {
		let url = self.repo_url(owner, repo, "")?;
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
		let url = self.repo_url(owner, repo, "/issues")?;
		let assignees = if request.assignee.is_empty() {
			Vec::new()
		} else {
			vec![request.assignee.as_str()]
		};
		let body = GhCreateIssue {
			title: &request.title,
			body: &request.body,
			labels: &request.labels,
			assignees,
		};
		let issue: GhIssue =
			read_json(PROVIDER, send(PROVIDER, self.request(Method::POST, url).json(&body)).await?)
				.await?;
		Ok(issue.into_record(owner, repo))
	}

	#[instrument(skip(self), fields(provider = PROVIDER))]
	async fn list_issues(&self, owner: &str, repo: &str) -> ScmResult<Vec<IssueRecord>> {
		let url = self.repo_url(owner, repo, "/issues")?;
		let request = self
			.request(Method::GET, url)
			.query(&[("per_page", PAGE_SIZE)]);
		let issues: Vec<GhIssue> = read_json(PROVIDER, send(PROVIDER, request).await?).await?;

		// The issues endpoint also returns pull requests.
		Ok(issues
			.into_iter()
			.filter(|i| i.pull_request.is_none())
			.map(|i| i.into_record(owner, repo))
			.collect())
	}
}
