// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Number of trailing log lines requested from the cluster.
pub const LOG_TAIL_LINES: i64 = 500;

/// Per-pod health summary, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
	pub name: String,
	/// Containers reporting `started`.
	pub current_count: usize,
	pub total_count: usize,
	/// Sum across all containers.
	pub restart_count: i32,
	/// "Running", or the reason of the last non-started container.
	pub pod_state: String,
	#[serde(rename = "podIP")]
	pub pod_ip: String,
	pub node_name: String,
	/// Relative age such as "3d" or "40s"; empty when the pod has no start time.
	pub age: String,
}

/// A cluster event whose involved object is a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PodEvent {
	#[serde(rename = "type")]
	pub type_: String,
	pub reason: String,
	pub message: String,
	pub count: i32,
	pub source: String,
	pub first_timestamp: Option<String>,
	pub last_timestamp: Option<String>,
}

/// Options for fetching container logs.
#[derive(Debug, Clone, Copy)]
pub struct LogOptions {
	pub tail_lines: i64,
	/// Read the previous (crashed) container instance.
	pub previous: bool,
}

impl Default for LogOptions {
	fn default() -> Self {
		Self {
			tail_lines: LOG_TAIL_LINES,
			previous: false,
		}
	}
}

/// Raw log chunks as they arrive from the API server.
pub type LogStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;
