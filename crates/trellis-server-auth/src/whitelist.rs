// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Paths reachable without a bearer token.
///
/// Entries are exact paths, or prefixes ending in `/*`. A prefix entry also
/// matches the bare prefix itself, so `/swagger/*` covers `/swagger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
	entries: Vec<String>,
}

impl Default for Whitelist {
	fn default() -> Self {
		Self::new([
			"/",
			"/health",
			"/favicon.ico",
			"/swagger/*",
			"/api-docs/*",
			"/api/v1/login",
		])
	}
}

impl Whitelist {
	pub fn new<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			entries: entries.into_iter().map(Into::into).collect(),
		}
	}

	pub fn is_whitelisted(&self, path: &str) -> bool {
		self.entries.iter().any(|entry| match entry.strip_suffix("/*") {
			Some(prefix) => {
				path == prefix
					|| path
						.strip_prefix(prefix)
						.is_some_and(|rest| rest.starts_with('/'))
			}
			None => path == entry,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_default_entries() {
		let list = Whitelist::default();
		assert!(list.is_whitelisted("/"));
		assert!(list.is_whitelisted("/health"));
		assert!(list.is_whitelisted("/favicon.ico"));
		assert!(list.is_whitelisted("/api/v1/login"));
		assert!(list.is_whitelisted("/swagger"));
		assert!(list.is_whitelisted("/swagger/index.html"));
		assert!(list.is_whitelisted("/api-docs/openapi.json"));
	}

	#[test]
	fn test_protected_paths() {
		let list = Whitelist::default();
		assert!(!list.is_whitelisted("/api/v1/user"));
		assert!(!list.is_whitelisted("/api/v1/login/extra"));
		assert!(!list.is_whitelisted("/swaggerish"));
		assert!(!list.is_whitelisted("/api/v1/github/octo"));
	}

	#[test]
	fn test_empty_list_protects_everything() {
		let list = Whitelist::new(Vec::<String>::new());
		assert!(!list.is_whitelisted("/"));
	}

	proptest! {
		#[test]
		fn api_routes_are_never_whitelisted(tail in "[a-z0-9/]{0,24}") {
			let path = format!("/api/v1/user{tail}");
			prop_assert!(!Whitelist::default().is_whitelisted(&path));
		}
	}
}
