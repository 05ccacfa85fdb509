// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Pod list aggregation.

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{ContainerStatus, Event, Pod};

use crate::types::{PodEvent, PodSummary};

pub const RUNNING: &str = "Running";

/// Collapse a pod's container statuses into one [`PodSummary`].
pub fn summarize_pod(pod: &Pod, now: DateTime<Utc>) -> PodSummary {
	let status = pod.status.as_ref();
	let containers: &[ContainerStatus] = status
		.and_then(|s| s.container_statuses.as_deref())
		.unwrap_or_default();

	let mut current_count = 0;
	let mut pod_state = RUNNING.to_string();
	for container in containers {
		if is_started(container) {
			current_count += 1;
		} else {
			pod_state = unhealthy_reason(container);
		}
	}

	let age = status
		.and_then(|s| s.start_time.as_ref())
		.map(|start| format_age(now - start.0))
		.unwrap_or_default();

	PodSummary {
		name: pod.metadata.name.clone().unwrap_or_default(),
		current_count,
		total_count: containers.len(),
		restart_count: containers.iter().map(|c| c.restart_count).sum(),
		pod_state,
		pod_ip: status.and_then(|s| s.pod_ip.clone()).unwrap_or_default(),
		node_name: pod
			.spec
			.as_ref()
			.and_then(|s| s.node_name.clone())
			.unwrap_or_default(),
		age,
	}
}

/// A container with no `started` field has not started.
pub(crate) fn is_started(container: &ContainerStatus) -> bool {
	container.started.unwrap_or(false)
}

/// State label for a container that has not started.
pub(crate) fn unhealthy_reason(container: &ContainerStatus) -> String {
	let state = container.state.as_ref();
	if let Some(waiting) = state.and_then(|s| s.waiting.as_ref()) {
		return waiting.reason.clone().unwrap_or_else(|| "Waiting".to_string());
	}
	if let Some(terminated) = state.and_then(|s| s.terminated.as_ref()) {
		return terminated
			.reason
			.clone()
			.unwrap_or_else(|| "Terminated".to_string());
	}
	"Unknown".to_string()
}

/// Largest whole unit only: "3d", "5h", "12m", "40s".
pub fn format_age(elapsed: chrono::Duration) -> String {
	let secs = elapsed.num_seconds().max(0);
	match secs {
		s if s >= 86_400 => format!("{}d", s / 86_400),
		s if s >= 3_600 => format!("{}h", s / 3_600),
		s if s >= 60 => format!("{}m", s / 60),
		s => format!("{s}s"),
	}
}

pub fn normalize_event(event: &Event) -> PodEvent {
	PodEvent {
		type_: event.type_.clone().unwrap_or_default(),
		reason: event.reason.clone().unwrap_or_default(),
		message: event.message.clone().unwrap_or_default(),
		count: event.count.unwrap_or(0),
		source: event
			.source
			.as_ref()
			.and_then(|s| s.component.clone())
			.unwrap_or_default(),
		first_timestamp: event.first_timestamp.as_ref().map(|t| t.0.to_rfc3339()),
		last_timestamp: event.last_timestamp.as_ref().map(|t| t.0.to_rfc3339()),
	}
}

#[cfg(test)]
pub(crate) mod fixtures {
	use k8s_openapi::api::core::v1::{
		ContainerState, ContainerStateTerminated, ContainerStateWaiting, ContainerStatus, Pod,
		PodSpec, PodStatus,
	};
	use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

	pub fn started(name: &str, restarts: i32) -> ContainerStatus {
		ContainerStatus {
			name: name.to_string(),
			started: Some(true),
			ready: true,
			restart_count: restarts,
			..Default::default()
		}
	}

	pub fn waiting(name: &str, reason: &str, restarts: i32) -> ContainerStatus {
		ContainerStatus {
			name: name.to_string(),
			started: Some(false),
			restart_count: restarts,
			state: Some(ContainerState {
				waiting: Some(ContainerStateWaiting {
					reason: Some(reason.to_string()),
					..Default::default()
				}),
				..Default::default()
			}),
			..Default::default()
		}
	}

	pub fn terminated(name: &str, reason: &str) -> ContainerStatus {
		ContainerStatus {
			name: name.to_string(),
			started: Some(false),
			state: Some(ContainerState {
				terminated: Some(ContainerStateTerminated {
					reason: Some(reason.to_string()),
					..Default::default()
				}),
				..Default::default()
			}),
			..Default::default()
		}
	}

	pub fn pod(name: &str, containers: Vec<ContainerStatus>, start: Option<&str>) -> Pod {
		Pod {
			metadata: ObjectMeta {
				name: Some(name.to_string()),
				namespace: Some("default".to_string()),
				..Default::default()
			},
			spec: Some(PodSpec {
				node_name: Some("node-1".to_string()),
				..Default::default()
			}),
			status: Some(PodStatus {
				pod_ip: Some("10.0.0.7".to_string()),
				phase: Some("Running".to_string()),
				start_time: start.map(|s| Time(s.parse().unwrap())),
				container_statuses: Some(containers),
				..Default::default()
			}),
		}
	}
}
