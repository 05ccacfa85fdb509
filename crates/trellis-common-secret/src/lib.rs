// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Redacting wrapper for credentials held by the server.
//!
//! Git host tokens, the JWT signing key, the inline kubeconfig and the
//! Postgres password all travel through configuration as [`SecretString`].
//! `Debug`, `Display` and `Serialize` print `[REDACTED]`; the inner value is
//! only reachable through [`Secret::expose`] and is zeroed on drop.
//!
//! ```
//! use trellis_common_secret::Secret;
//!
//! let token = Secret::new("ghp_example".to_string());
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(token.expose(), "ghp_example");
//! ```

mod env;

pub use env::{load_secret_env, SecretEnvError};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper for sensitive values that prevents accidental exposure.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped string is empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

impl<T> Serialize for Secret<T>
where
	T: Serialize + Zeroize,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

impl<'de, T> Deserialize<'de> for Secret<T>
where
	T: Deserialize<'de> + Zeroize,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_is_redacted() {
		let secret = Secret::new("glpat-abcdef".to_string());
		let debug_output = format!("{secret:?}");

		assert!(!debug_output.contains("glpat-abcdef"));
		assert_eq!(debug_output, "Secret(\"[REDACTED]\")");
	}

	#[test]
	fn display_is_redacted() {
		let secret = Secret::new("glpat-abcdef".to_string());
		assert_eq!(format!("{secret}"), REDACTED);
	}

	#[test]
	fn option_secret_debug_is_redacted() {
		let secret: Option<SecretString> = Some(Secret::new("signing-key".to_string()));
		let debug = format!("{secret:?}");
		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("signing-key"));
	}

	#[test]
	fn serialize_is_redacted_and_deserialize_populates() {
		let secret = Secret::new("hunter2".to_string());
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, "\"[REDACTED]\"");

		let parsed: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
		assert_eq!(parsed, secret);
	}

	#[test]
	fn blank_detection() {
		assert!(Secret::new("   ".to_string()).is_blank());
		assert!(Secret::new(String::new()).is_blank());
		assert!(!Secret::new("k".to_string()).is_blank());
	}

	proptest! {
		#[test]
		fn debug_never_contains_secret(inner in "[a-zA-Z0-9_.-]{3,50}") {
			prop_assume!(!inner.contains("REDACTED"));
			prop_assume!(!inner.contains("Secret"));

			let secret = Secret::new(inner.clone());
			let rendered = format!("{:?}", secret);
			prop_assert!(!rendered.contains(&inner));
		}

		#[test]
		fn expose_roundtrips(inner in ".*") {
			let secret = Secret::new(inner.clone());
			prop_assert_eq!(secret.expose(), &inner);
		}
	}
}
