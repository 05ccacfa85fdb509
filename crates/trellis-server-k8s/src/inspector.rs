// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tracing::{debug, instrument};

use crate::client::K8sClient;
use crate::describe::render_pod_description;
use crate::error::{K8sError, K8sResult};
use crate::summary::{normalize_event, summarize_pod};
use crate::types::{LogOptions, PodEvent, PodSummary};

/// Read-only queries against one cluster.
#[derive(Clone)]
pub struct ClusterInspector {
	client: Arc<dyn K8sClient>,
}

impl ClusterInspector {
	pub fn new(client: Arc<dyn K8sClient>) -> Self {
		Self { client }
	}

	#[instrument(skip(self))]
	pub async fn list_pods(&self, namespace: &str) -> K8sResult<Vec<PodSummary>> {
		let pods = self.client.list_pods(namespace).await?;
		let now = Utc::now();
		Ok(pods.iter().map(|pod| summarize_pod(pod, now)).collect())
	}

	#[instrument(skip(self))]
	pub async fn pod_events(&self, namespace: &str, pod: &str) -> K8sResult<Vec<PodEvent>> {
		let events = self.client.list_pod_events(namespace, pod).await?;
		Ok(events.iter().map(normalize_event).collect())
	}

	/// The last 500 lines of the pod's logs, read to end-of-stream.
	#[instrument(skip(self))]
	pub async fn pod_logs(&self, namespace: &str, pod: &str, previous: bool) -> K8sResult<String> {
		let opts = LogOptions {
			previous,
			..LogOptions::default()
		};
		let mut stream = self.client.stream_logs(pod, namespace, opts).await?;

		let mut logs = Vec::new();
		while let Some(chunk) = stream.next().await {
			let chunk = chunk.map_err(|e| K8sError::StreamError {
				message: e.to_string(),
			})?;
			logs.extend_from_slice(&chunk);
		}
		debug!(bytes = logs.len(), "read pod logs");

		Ok(String::from_utf8_lossy(&logs).into_owned())
	}

	#[instrument(skip(self))]
	pub async fn describe_pod(&self, namespace: &str, pod: &str) -> K8sResult<String> {
		let pod = self.client.get_pod(pod, namespace).await?;
		Ok(render_pod_description(&pod))
	}
}
