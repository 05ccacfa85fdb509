// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication for the Trellis server.
//!
//! - [`issue_token`] / [`validate_token`]: HS256 JWTs with a 72 hour lifetime
//! - [`Whitelist`]: paths served without a token
//! - [`extract_bearer_token`] / [`authenticate`]: header parsing
//!
//! Token values are never logged.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod whitelist;

pub use error::{AuthError, Result};
pub use jwt::{issue_token, issue_token_at, validate_token, Claims, TOKEN_LIFETIME};
pub use middleware::{authenticate, extract_bearer_token};
pub use whitelist::Whitelist;
