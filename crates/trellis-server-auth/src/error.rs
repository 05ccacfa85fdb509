// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("no JWT signing key is configured")]
	MissingSigningKey,

	#[error("missing bearer token")]
	MissingToken,

	#[error("token has expired")]
	Expired,

	#[error("invalid token: {0}")]
	InvalidToken(String),

	#[error("failed to sign token: {0}")]
	Signing(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
