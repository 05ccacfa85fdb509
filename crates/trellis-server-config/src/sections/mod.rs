// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for trellis-server.

pub mod auth;
pub mod database;
pub mod http;
pub mod kubernetes;
pub mod logging;
pub mod scm;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{
	DatabaseBackend, DatabaseConfig, DatabaseConfigLayer, PostgresConfig, PostgresConfigLayer,
};
pub use http::{HttpConfig, HttpConfigLayer};
pub use kubernetes::{KubernetesConfig, KubernetesConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use scm::{ScmConfig, ScmConfigLayer};
