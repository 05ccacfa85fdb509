// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Kubernetes cluster access configuration.

use std::path::PathBuf;

use serde::Deserialize;
use trellis_common_secret::SecretString;

#[derive(Debug, Clone, Default)]
pub struct KubernetesConfig {
	pub enabled: bool,
	/// Path to a kubeconfig file.
	pub kubeconfig_path: Option<PathBuf>,
	/// Inline kubeconfig YAML; takes priority over `kubeconfig_path`.
	pub kubeconfig: Option<SecretString>,
	pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KubernetesConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub kubeconfig_path: Option<PathBuf>,
	#[serde(default, alias = "cluster_token")]
	pub kubeconfig: Option<SecretString>,
	#[serde(default)]
	pub context: Option<String>,
}

impl KubernetesConfigLayer {
	pub fn merge(&mut self, other: KubernetesConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.kubeconfig_path.is_some() {
			self.kubeconfig_path = other.kubeconfig_path;
		}
		if other.kubeconfig.is_some() {
			self.kubeconfig = other.kubeconfig;
		}
		if other.context.is_some() {
			self.context = other.context;
		}
	}

	pub fn finalize(self) -> KubernetesConfig {
		KubernetesConfig {
			enabled: self.enabled.unwrap_or(false),
			kubeconfig_path: self.kubeconfig_path,
			kubeconfig: self.kubeconfig,
			context: self.context,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_disabled_by_default() {
		let config = KubernetesConfigLayer::default().finalize();
		assert!(!config.enabled);
		assert!(config.kubeconfig_path.is_none());
	}

	#[test]
	fn test_cluster_token_alias() {
		let layer: KubernetesConfigLayer =
			toml::from_str("enabled = true\ncluster_token = \"apiVersion: v1\"").unwrap();
		let config = layer.finalize();
		assert!(config.enabled);
		assert_eq!(config.kubeconfig.unwrap().expose(), "apiVersion: v1");
	}
}
