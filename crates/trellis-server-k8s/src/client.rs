// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};

use crate::error::K8sError;
use crate::types::{LogOptions, LogStream};

/// Read-only K8s operations needed by the cluster inspector.
///
/// Implemented over `kube` in production and by hand-written mocks in tests.
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// List every pod in a namespace.
	async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, K8sError>;

	/// Get a specific pod by name from the specified namespace.
	async fn get_pod(&self, name: &str, namespace: &str) -> Result<Pod, K8sError>;

	/// Events whose `involvedObject.name` is `pod_name`.
	async fn list_pod_events(&self, namespace: &str, pod_name: &str) -> Result<Vec<Event>, K8sError>;

	/// Stream logs from a pod's default container.
	async fn stream_logs(
		&self,
		name: &str,
		namespace: &str,
		opts: LogOptions,
	) -> Result<LogStream, K8sError>;
}
