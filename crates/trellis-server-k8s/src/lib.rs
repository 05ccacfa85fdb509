// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Read-only Kubernetes inspection for Trellis.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - Pod summaries, normalized events, log tails and text descriptions

mod client;
mod describe;
mod error;
mod inspector;
mod kube_client;
mod summary;
mod types;

pub use client::K8sClient;
pub use describe::{render_pod_description, VolumeSourceKind};
pub use error::{K8sError, K8sResult};
pub use inspector::ClusterInspector;
pub use kube_client::KubeClient;
pub use summary::{format_age, normalize_event, summarize_pod};
pub use types::{LogOptions, LogStream, PodEvent, PodSummary, LOG_TAIL_LINES};
