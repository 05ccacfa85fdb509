// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::{
	api::{Api, ListParams, LogParams},
	config::{KubeConfigOptions, Kubeconfig},
	Client, Config,
};
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tracing::{debug, instrument};
use trellis_server_config::KubernetesConfig;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{LogOptions, LogStream};

/// Log reads are issued in chunks of this many bytes.
const LOG_CHUNK_SIZE: usize = 2000;

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Build a client from the `kubernetes` config section.
	///
	/// An inline kubeconfig document wins over a kubeconfig path. Without
	/// either, configuration is inferred the way `kubectl` does it.
	#[instrument(skip(config), fields(context = ?config.context))]
	pub async fn from_config(config: &KubernetesConfig) -> Result<Self, K8sError> {
		let options = KubeConfigOptions {
			context: config.context.clone(),
			..Default::default()
		};

		let kube_config = if let Some(inline) = &config.kubeconfig {
			let kubeconfig = Kubeconfig::from_yaml(inline.expose()).map_err(K8sError::config)?;
			Config::from_custom_kubeconfig(kubeconfig, &options)
				.await
				.map_err(K8sError::config)?
		} else if let Some(path) = &config.kubeconfig_path {
			let kubeconfig = Kubeconfig::read_from(path).map_err(K8sError::config)?;
			Config::from_custom_kubeconfig(kubeconfig, &options)
				.await
				.map_err(K8sError::config)?
		} else if config.context.is_some() {
			Config::from_kubeconfig(&options)
				.await
				.map_err(K8sError::config)?
		} else {
			Config::infer().await.map_err(K8sError::config)?
		};

		let client = Client::try_from(kube_config)?;
		debug!("K8s client initialized from config");
		Ok(Self { client })
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	#[instrument(skip(self))]
	async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		let pod_list = pods.list(&ListParams::default()).await?;
		Ok(pod_list.items)
	}

	#[instrument(skip(self))]
	async fn get_pod(&self, name: &str, namespace: &str) -> Result<Pod, K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		match pods.get(name).await {
			Ok(pod) => Ok(pod),
			Err(kube::Error::Api(err)) if err.code == 404 => {
				Err(K8sError::PodNotFound { name: name.into() })
			}
			Err(e) => Err(e.into()),
		}
	}

	#[instrument(skip(self))]
	async fn list_pod_events(&self, namespace: &str, pod_name: &str) -> Result<Vec<Event>, K8sError> {
		let events: Api<Event> = Api::namespaced(self.client.clone(), namespace);
		let lp = ListParams::default().fields(&format!("involvedObject.name={pod_name}"));
		let event_list = events.list(&lp).await?;
		Ok(event_list.items)
	}

	#[instrument(skip(self, opts), fields(previous = opts.previous))]
	async fn stream_logs(
		&self,
		name: &str,
		namespace: &str,
		opts: LogOptions,
	) -> Result<LogStream, K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		let lp = LogParams {
			tail_lines: Some(opts.tail_lines),
			previous: opts.previous,
			..Default::default()
		};

		let stream = pods.log_stream(name, &lp).await.map_err(|e| match e {
			kube::Error::Api(ref err) if err.code == 404 => K8sError::PodNotFound { name: name.into() },
			_ => K8sError::StreamError {
				message: e.to_string(),
			},
		})?;

		let compat_stream = stream.compat();
		let chunks = tokio_util::io::ReaderStream::with_capacity(compat_stream, LOG_CHUNK_SIZE);
		Ok(Box::pin(chunks))
	}
}
