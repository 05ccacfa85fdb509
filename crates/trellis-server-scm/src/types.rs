// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Provider-independent records returned by every [`crate::ScmClient`].

use serde::{Deserialize, Serialize};

/// A repository as reported live by the git host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
	pub name: String,
	pub description: String,
	pub is_private: bool,
	/// Provider-native identifier, stringified.
	pub id: String,
}

/// A CI workflow definition (GitHub Actions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkflowRecord {
	pub name: String,
	pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IssueRecord {
	pub title: String,
	pub body: String,
	/// In provider order; never sorted or deduplicated.
	pub labels: Vec<String>,
	pub assignee: String,
	pub owner: String,
	pub repo: String,
}

/// Body of `POST /api/v1/github/{owner}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateRepositoryRequest {
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub is_private: bool,
	/// Initialize the repository with a README.
	#[serde(default, alias = "isAutoInit")]
	pub is_auto_int: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateIssueRequest {
	pub title: String,
	#[serde(default)]
	pub body: String,
	#[serde(default)]
	pub labels: Vec<String>,
	#[serde(default)]
	pub assignee: String,
}

/// Body of `POST /api/v1/dispatch/{owner}/{repo}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DispatchWorkflowRequest {
	/// Workflow file name, e.g. `ci.yml`, or numeric workflow id.
	pub workflow_file: String,
	#[serde(alias = "ref")]
	pub branch: String,
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub inputs: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn repository_record_uses_camel_case() {
		let record = RepositoryRecord {
			name: "hello".to_string(),
			description: String::new(),
			is_private: true,
			id: "42".to_string(),
		};
		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(json["isPrivate"], true);
		assert_eq!(json["id"], "42");
	}

	#[test]
	fn create_request_defaults_optional_fields() {
		let req: CreateRepositoryRequest = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
		assert_eq!(req.name, "x");
		assert!(!req.is_private);
		assert!(!req.is_auto_int);

		let req: CreateRepositoryRequest =
			serde_json::from_str(r#"{"name":"x","isPrivate":true,"isAutoInt":true}"#).unwrap();
		assert!(req.is_private);
		assert!(req.is_auto_int);
	}

	#[test]
	fn dispatch_request_accepts_ref_alias() {
		let req: DispatchWorkflowRequest = serde_json::from_str(
			r#"{"workflowFile":"ci.yml","ref":"main","inputs":{"env":"prod"}}"#,
		)
		.unwrap();
		assert_eq!(req.branch, "main");
		assert_eq!(req.inputs["env"], "prod");
	}
}
