// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Read-only cluster inspection handlers.
//!
//! All routes answer 503 when cluster inspection is disabled.

use axum::{
	extract::{Path, Query, State},
	Json,
};
use serde::Deserialize;
use trellis_server_k8s::{ClusterInspector, K8sError, PodEvent, PodSummary};
use utoipa::IntoParams;

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
	/// Read logs of the previous container instance.
	#[serde(default)]
	pub previous: bool,
}

fn inspector(state: &AppState) -> Result<&ClusterInspector, ServerError> {
	state
		.cluster
		.as_ref()
		.ok_or(ServerError::K8s(K8sError::Disabled))
}

#[utoipa::path(
    get,
    path = "/api/v1/k8s/{namespace}/pods",
    params(("namespace" = String, Path, description = "Kubernetes namespace")),
    responses(
        (status = 200, description = "Pod summaries", body = Vec<PodSummary>),
        (status = 500, description = "Cluster error", body = crate::error::ErrorResponse),
        (status = 503, description = "Cluster inspection disabled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "k8s"
)]
/// GET /api/v1/k8s/{namespace}/pods - Summarize every pod in a namespace.
#[tracing::instrument(skip(state))]
pub async fn list_pods(
	State(state): State<AppState>,
	Path(namespace): Path<String>,
) -> Result<Json<Vec<PodSummary>>, ServerError> {
	Ok(Json(inspector(&state)?.list_pods(&namespace).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/k8s/{namespace}/pods/{pod}/events",
    params(
        ("namespace" = String, Path, description = "Kubernetes namespace"),
        ("pod" = String, Path, description = "Pod name")
    ),
    responses(
        (status = 200, description = "Events involving the pod", body = Vec<PodEvent>),
        (status = 500, description = "Cluster error", body = crate::error::ErrorResponse),
        (status = 503, description = "Cluster inspection disabled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "k8s"
)]
/// GET /api/v1/k8s/{namespace}/pods/{pod}/events
#[tracing::instrument(skip(state))]
pub async fn pod_events(
	State(state): State<AppState>,
	Path((namespace, pod)): Path<(String, String)>,
) -> Result<Json<Vec<PodEvent>>, ServerError> {
	Ok(Json(inspector(&state)?.pod_events(&namespace, &pod).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/k8s/{namespace}/pods/{pod}/logs",
    params(
        ("namespace" = String, Path, description = "Kubernetes namespace"),
        ("pod" = String, Path, description = "Pod name"),
        LogsQuery
    ),
    responses(
        (status = 200, description = "Last 500 log lines", body = String, content_type = "text/plain"),
        (status = 500, description = "Cluster error", body = crate::error::ErrorResponse),
        (status = 503, description = "Cluster inspection disabled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "k8s"
)]
/// GET /api/v1/k8s/{namespace}/pods/{pod}/logs - Tail a pod's logs.
#[tracing::instrument(skip(state))]
pub async fn pod_logs(
	State(state): State<AppState>,
	Path((namespace, pod)): Path<(String, String)>,
	Query(query): Query<LogsQuery>,
) -> Result<String, ServerError> {
	Ok(inspector(&state)?
		.pod_logs(&namespace, &pod, query.previous)
		.await?)
}

#[utoipa::path(
    get,
    path = "/api/v1/k8s/{namespace}/pods/{pod}/describe",
    params(
        ("namespace" = String, Path, description = "Kubernetes namespace"),
        ("pod" = String, Path, description = "Pod name")
    ),
    responses(
        (status = 200, description = "Human readable pod description", body = String, content_type = "text/plain"),
        (status = 500, description = "Cluster error", body = crate::error::ErrorResponse),
        (status = 503, description = "Cluster inspection disabled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "k8s"
)]
/// GET /api/v1/k8s/{namespace}/pods/{pod}/describe
#[tracing::instrument(skip(state))]
pub async fn describe_pod(
	State(state): State<AppState>,
	Path((namespace, pod)): Path<(String, String)>,
) -> Result<String, ServerError> {
	Ok(inspector(&state)?.describe_pod(&namespace, &pod).await?)
}
