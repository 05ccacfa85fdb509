// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Git host clients for Trellis.
//!
//! This crate provides:
//! - The [`ScmClient`] trait, one capability set for every git host
//! - REST implementations for GitHub ([`GitHubClient`]) and GitLab ([`GitLabClient`])
//! - [`select_provider`] / [`create_scm_client`] to pick a backend from configuration

mod client;
mod error;
mod factory;
mod github;
mod gitlab;
mod http;
mod types;

pub use client::ScmClient;
pub use error::{ScmError, ScmResult};
pub use factory::{create_scm_client, select_provider, ScmProvider};
pub use github::GitHubClient;
pub use gitlab::GitLabClient;
pub use types::{
	CreateIssueRequest, CreateRepositoryRequest, DispatchWorkflowRequest, IssueRecord,
	RepositoryRecord, WorkflowRecord,
};
