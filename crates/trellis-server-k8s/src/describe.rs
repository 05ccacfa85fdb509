// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Plain-text pod description, loosely modelled on `kubectl describe pod`.
//!
//! Sections appear in a fixed order: identity, labels, annotations, phase and
//! IP, container statuses, container specs, volumes, then pod conditions.

use std::collections::BTreeMap;
use std::fmt::Write;

use k8s_openapi::api::core::v1::{
	CSIVolumeSource, ConfigMapVolumeSource, Container, ContainerStatus, DownwardAPIVolumeSource,
	EmptyDirVolumeSource, EphemeralVolumeSource, HostPathVolumeSource, NFSVolumeSource,
	PersistentVolumeClaimVolumeSource, Pod, PodCondition, ProjectedVolumeSource,
	SecretVolumeSource, Volume,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use crate::summary::{is_started, unhealthy_reason, RUNNING};

const MAP_INDENT: &str = "             ";

/// The populated source of a volume.
#[derive(Debug, Clone, Copy)]
pub enum VolumeSourceKind<'a> {
	ConfigMap(&'a ConfigMapVolumeSource),
	Secret(&'a SecretVolumeSource),
	EmptyDir(&'a EmptyDirVolumeSource),
	HostPath(&'a HostPathVolumeSource),
	PersistentVolumeClaim(&'a PersistentVolumeClaimVolumeSource),
	Projected(&'a ProjectedVolumeSource),
	DownwardApi(&'a DownwardAPIVolumeSource),
	Csi(&'a CSIVolumeSource),
	Nfs(&'a NFSVolumeSource),
	Ephemeral(&'a EphemeralVolumeSource),
}

impl<'a> VolumeSourceKind<'a> {
	/// Every source set on the volume. Normally exactly one; an empty result
	/// means a source type this renderer does not know.
	pub fn of(volume: &'a Volume) -> Vec<Self> {
		let mut kinds = Vec::new();
		if let Some(s) = &volume.config_map {
			kinds.push(Self::ConfigMap(s));
		}
		if let Some(s) = &volume.secret {
			kinds.push(Self::Secret(s));
		}
		if let Some(s) = &volume.empty_dir {
			kinds.push(Self::EmptyDir(s));
		}
		if let Some(s) = &volume.host_path {
			kinds.push(Self::HostPath(s));
		}
		if let Some(s) = &volume.persistent_volume_claim {
			kinds.push(Self::PersistentVolumeClaim(s));
		}
		if let Some(s) = &volume.projected {
			kinds.push(Self::Projected(s));
		}
		if let Some(s) = &volume.downward_api {
			kinds.push(Self::DownwardApi(s));
		}
		if let Some(s) = &volume.csi {
			kinds.push(Self::Csi(s));
		}
		if let Some(s) = &volume.nfs {
			kinds.push(Self::Nfs(s));
		}
		if let Some(s) = &volume.ephemeral {
			kinds.push(Self::Ephemeral(s));
		}
		kinds
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Self::ConfigMap(_) => "ConfigMap",
			Self::Secret(_) => "Secret",
			Self::EmptyDir(_) => "EmptyDir",
			Self::HostPath(_) => "HostPath",
			Self::PersistentVolumeClaim(_) => "PersistentVolumeClaim",
			Self::Projected(_) => "Projected",
			Self::DownwardApi(_) => "DownwardAPI",
			Self::Csi(_) => "CSI",
			Self::Nfs(_) => "NFS",
			Self::Ephemeral(_) => "Ephemeral",
		}
	}

	/// One-line detail of the source.
	pub fn detail(&self) -> String {
		match self {
			Self::ConfigMap(s) => compact_json(s),
			Self::Secret(s) => s.secret_name.clone().unwrap_or_default(),
			Self::EmptyDir(s) => match (&s.medium, &s.size_limit) {
				(Some(medium), Some(limit)) => format!("medium={medium} sizeLimit={}", limit.0),
				(Some(medium), None) => format!("medium={medium}"),
				(None, Some(limit)) => format!("sizeLimit={}", limit.0),
				(None, None) => String::new(),
			},
			Self::HostPath(s) => s.path.clone(),
			Self::PersistentVolumeClaim(s) => {
				format!(
					"{} (readOnly={})",
					s.claim_name,
					s.read_only.unwrap_or(false)
				)
			}
			Self::Projected(s) => compact_json(s),
			Self::DownwardApi(s) => compact_json(s),
			Self::Csi(s) => s.driver.clone(),
			Self::Nfs(s) => format!("{}:{}", s.server, s.path),
			Self::Ephemeral(s) => compact_json(s),
		}
	}
}

fn compact_json<T: serde::Serialize>(value: &T) -> String {
	serde_json::to_string(value).unwrap_or_default()
}

/// Render the full description of one pod.
pub fn render_pod_description(pod: &Pod) -> String {
	let mut out = String::new();
	let meta = &pod.metadata;
	let spec = pod.spec.as_ref();
	let status = pod.status.as_ref();

	line(&mut out, "Name", meta.name.as_deref().unwrap_or_default());
	line(&mut out, "Namespace", meta.namespace.as_deref().unwrap_or_default());
	line(
		&mut out,
		"Node",
		spec.and_then(|s| s.node_name.as_deref()).unwrap_or_default(),
	);
	line(
		&mut out,
		"Start Time",
		&timestamp(status.and_then(|s| s.start_time.as_ref())),
	);

	write_map(&mut out, "Labels", meta.labels.as_ref(), "=");
	write_map(&mut out, "Annotations", meta.annotations.as_ref(), ": ");

	line(
		&mut out,
		"Status",
		status.and_then(|s| s.phase.as_deref()).unwrap_or_default(),
	);
	line(
		&mut out,
		"IP",
		status.and_then(|s| s.pod_ip.as_deref()).unwrap_or_default(),
	);

	write_container_statuses(
		&mut out,
		status
			.and_then(|s| s.container_statuses.as_deref())
			.unwrap_or_default(),
	);
	write_container_specs(
		&mut out,
		spec.map(|s| s.containers.as_slice()).unwrap_or_default(),
	);
	write_volumes(
		&mut out,
		spec.and_then(|s| s.volumes.as_deref()).unwrap_or_default(),
	);
	write_conditions(
		&mut out,
		status
			.and_then(|s| s.conditions.as_deref())
			.unwrap_or_default(),
	);

	out
}

fn line(out: &mut String, key: &str, value: &str) {
	let _ = writeln!(out, "{key}: {value}");
}

fn timestamp(time: Option<&Time>) -> String {
	time.map(|t| t.0.to_rfc3339()).unwrap_or_default()
}

fn quantity(map: Option<&BTreeMap<String, Quantity>>, key: &str) -> String {
	map.and_then(|m| m.get(key))
		.map(|q| q.0.clone())
		.unwrap_or_else(|| "0".to_string())
}

fn write_map(out: &mut String, title: &str, map: Option<&BTreeMap<String, String>>, sep: &str) {
	let _ = writeln!(out, "{title}:");
	for (key, value) in map.into_iter().flatten() {
		let _ = writeln!(out, "{MAP_INDENT}{key}{sep}{value}");
	}
}

fn write_container_statuses(out: &mut String, statuses: &[ContainerStatus]) {
	let _ = writeln!(out, "Containers:");
	for status in statuses {
		let _ = writeln!(out, "  {}", status.name);
		let _ = writeln!(
			out,
			"    Container ID: {}",
			status.container_id.as_deref().unwrap_or_default()
		);
		let _ = writeln!(out, "    Image: {}", status.image);
		let _ = writeln!(out, "    Image ID: {}", status.image_id);

		if is_started(status) {
			let started_at = status
				.state
				.as_ref()
				.and_then(|s| s.running.as_ref())
				.and_then(|r| r.started_at.as_ref());
			let _ = writeln!(out, "    State: {RUNNING}");
			let _ = writeln!(out, "      Started: {}", timestamp(started_at));
		} else {
			let _ = writeln!(out, "    State: {}", unhealthy_reason(status));
		}

		let _ = writeln!(out, "    Ready: {}", status.ready);
		let _ = writeln!(out, "    Restart Count: {}", status.restart_count);
	}
}

fn write_container_specs(out: &mut String, containers: &[Container]) {
	for container in containers {
		let _ = writeln!(out, "  {}", container.name);

		for port in container.ports.iter().flatten() {
			let protocol = port.protocol.as_deref().unwrap_or("TCP");
			let _ = writeln!(out, "    Port: {}/{protocol}", port.container_port);
			let _ = writeln!(
				out,
				"    Host Port: {}/{protocol}",
				port.host_port.unwrap_or(0)
			);
		}

		let resources = container.resources.as_ref();
		let limits = resources.and_then(|r| r.limits.as_ref());
		let requests = resources.and_then(|r| r.requests.as_ref());

		let _ = writeln!(out, "    Limits:");
		let _ = writeln!(out, "      cpu: {}", quantity(limits, "cpu"));
		let _ = writeln!(out, "      memory: {}", quantity(limits, "memory"));
		let _ = writeln!(out, "    Requests:");
		let _ = writeln!(out, "      cpu: {}", quantity(requests, "cpu"));
		let _ = writeln!(out, "      memory: {}", quantity(requests, "memory"));

		let _ = writeln!(out, "    VolumeMounts:");
		for mount in container.volume_mounts.iter().flatten() {
			let _ = writeln!(out, "      {}", mount.name);
			let _ = writeln!(out, "        ReadOnly: {}", mount.read_only.unwrap_or(false));
			let _ = writeln!(out, "        MountPath: {}", mount.mount_path);
			let _ = writeln!(
				out,
				"        SubPath: {}",
				mount.sub_path.as_deref().unwrap_or_default()
			);
		}
	}
}

fn write_volumes(out: &mut String, volumes: &[Volume]) {
	let _ = writeln!(out, "Volumes:");
	for volume in volumes {
		let _ = writeln!(out, "  {}", volume.name);
		for kind in VolumeSourceKind::of(volume) {
			let _ = writeln!(out, "    type: {}", kind.type_name());
			let _ = writeln!(out, "    name: {}", kind.detail());
		}
	}
}

fn write_conditions(out: &mut String, conditions: &[PodCondition]) {
	let _ = writeln!(out, "PodStatus:");
	for (i, condition) in conditions.iter().enumerate() {
		let _ = writeln!(out, "  [{i}]");
		let _ = writeln!(out, "  Type: {}", condition.type_);
		let _ = writeln!(out, "  Status: {}", condition.status);
		let _ = writeln!(
			out,
			"  LastProbeTime: {}",
			timestamp(condition.last_probe_time.as_ref())
		);
		let _ = writeln!(
			out,
			"  LastTransitionTime: {}",
			timestamp(condition.last_transition_time.as_ref())
		);
		let _ = writeln!(
			out,
			"  Reason: {}",
			condition.reason.as_deref().unwrap_or_default()
		);
		let _ = writeln!(
			out,
			"  Message: {}",
			condition.message.as_deref().unwrap_or_default()
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::summary::fixtures::{pod, started, waiting};
	use k8s_openapi::api::core::v1::{
		ContainerPort, ResourceRequirements, VolumeMount,
	};

	fn described_pod() -> Pod {
		let mut pod = pod(
			"web-7f9c",
			vec![started("web", 2), waiting("init-db", "CrashLoopBackOff", 5)],
			Some("2024-01-01T00:00:00Z"),
		);
		pod.metadata.labels = Some(BTreeMap::from([
			("app".to_string(), "web".to_string()),
			("tier".to_string(), "frontend".to_string()),
		]));
		pod.metadata.annotations = Some(BTreeMap::from([(
			"owner".to_string(),
			"platform".to_string(),
		)]));

		let spec = pod.spec.get_or_insert_with(Default::default);
		spec.containers = vec![Container {
			name: "web".to_string(),
			ports: Some(vec![ContainerPort {
				container_port: 8080,
				protocol: Some("TCP".to_string()),
				..Default::default()
			}]),
			resources: Some(ResourceRequirements {
				limits: Some(BTreeMap::from([(
					"memory".to_string(),
					Quantity("256Mi".to_string()),
				)])),
				..Default::default()
			}),
			volume_mounts: Some(vec![VolumeMount {
				name: "data".to_string(),
				mount_path: "/var/lib/web".to_string(),
				read_only: Some(true),
				..Default::default()
			}]),
			..Default::default()
		}];
		spec.volumes = Some(vec![
			Volume {
				name: "data".to_string(),
				persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
					claim_name: "web-data".to_string(),
					read_only: Some(false),
				}),
				..Default::default()
			},
			Volume {
				name: "host".to_string(),
				host_path: Some(HostPathVolumeSource {
					path: "/var/log".to_string(),
					..Default::default()
				}),
				..Default::default()
			},
		]);

		let status = pod.status.get_or_insert_with(Default::default);
		status.conditions = Some(vec![PodCondition {
			type_: "Ready".to_string(),
			status: "False".to_string(),
			reason: Some("ContainersNotReady".to_string()),
			..Default::default()
		}]);
		pod
	}

	#[test]
	fn test_sections_in_order() {
		let text = render_pod_description(&described_pod());
		let order = [
			"Name: web-7f9c",
			"Namespace: default",
			"Node: node-1",
			"Start Time: 2024-01-01T00:00:00+00:00",
			"Labels:",
			"Annotations:",
			"Status: Running",
			"IP: 10.0.0.7",
			"Containers:",
			"    Limits:",
			"Volumes:",
			"PodStatus:",
		];
		let mut last = 0;
		for needle in order {
			let pos = text[last..]
				.find(needle)
				.unwrap_or_else(|| panic!("{needle} missing or out of order in:\n{text}"));
			last += pos + needle.len();
		}
	}

	#[test]
	fn test_labels_sorted_and_annotations_colon() {
		let text = render_pod_description(&described_pod());
		assert!(text.contains(&format!("{MAP_INDENT}app=web\n{MAP_INDENT}tier=frontend\n")));
		assert!(text.contains(&format!("{MAP_INDENT}owner: platform\n")));
	}

	#[test]
	fn test_container_status_detail() {
		let text = render_pod_description(&described_pod());
		assert!(text.contains("  web\n    Container ID: \n"));
		assert!(text.contains("    State: Running\n      Started: \n"));
		assert!(text.contains("    State: CrashLoopBackOff\n    Ready: false\n    Restart Count: 5\n"));
	}

	#[test]
	fn test_container_spec_detail() {
		let text = render_pod_description(&described_pod());
		assert!(text.contains("    Port: 8080/TCP\n    Host Port: 0/TCP\n"));
		assert!(text.contains("    Limits:\n      cpu: 0\n      memory: 256Mi\n"));
		assert!(text.contains("    Requests:\n      cpu: 0\n      memory: 0\n"));
		assert!(text.contains(
			"      data\n        ReadOnly: true\n        MountPath: /var/lib/web\n        SubPath: \n"
		));
	}

	#[test]
	fn test_volume_sources_tagged() {
		let text = render_pod_description(&described_pod());
		assert!(text.contains("  data\n    type: PersistentVolumeClaim\n    name: web-data (readOnly=false)\n"));
		assert!(text.contains("  host\n    type: HostPath\n    name: /var/log\n"));
	}

	#[test]
	fn test_conditions_listed_once() {
		let text = render_pod_description(&described_pod());
		assert_eq!(text.matches("  [0]\n").count(), 1);
		assert!(text.contains("  Type: Ready\n  Status: False\n"));
		assert!(text.contains("  Reason: ContainersNotReady\n  Message: \n"));
	}

	#[test]
	fn test_empty_pod_renders_headings() {
		let text = render_pod_description(&Pod::default());
		assert!(text.starts_with("Name: \nNamespace: \n"));
		assert!(text.ends_with("PodStatus:\n"));
	}

	#[test]
	fn test_unknown_volume_source_has_no_kind() {
		let volume = Volume {
			name: "odd".to_string(),
			..Default::default()
		};
		assert!(VolumeSourceKind::of(&volume).is_empty());
	}
}
