// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `VAR` / `VAR_FILE` secret loading, for Docker and Kubernetes mounted secrets.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::SecretString;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` (preferred) or `{var}`.
///
/// A single trailing newline is stripped from file contents. Returns
/// `Ok(None)` when neither variable is set or the direct value is empty.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		tracing::debug!(var = %file_var, "loaded secret from file");
		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test uses its own variable names so they can run in parallel.

	#[test]
	fn unset_returns_none() {
		assert!(load_secret_env("TRELLIS_TEST_SECRET_UNSET").unwrap().is_none());
	}

	#[test]
	fn direct_value_is_used() {
		env::set_var("TRELLIS_TEST_SECRET_DIRECT", "abc");
		let secret = load_secret_env("TRELLIS_TEST_SECRET_DIRECT").unwrap().unwrap();
		assert_eq!(secret.expose(), "abc");
	}

	#[test]
	fn file_takes_precedence_and_strips_newline() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var("TRELLIS_TEST_SECRET_BOTH", "direct");
		env::set_var(
			"TRELLIS_TEST_SECRET_BOTH_FILE",
			file.path().to_str().unwrap(),
		);
		let secret = load_secret_env("TRELLIS_TEST_SECRET_BOTH").unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");
	}

	#[test]
	fn empty_file_path_is_an_error() {
		env::set_var("TRELLIS_TEST_SECRET_EMPTY_FILE", "");
		let err = load_secret_env("TRELLIS_TEST_SECRET_EMPTY").unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { .. }));
	}
}
