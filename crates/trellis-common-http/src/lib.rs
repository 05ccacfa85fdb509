// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Trellis.
//!
//! Every outbound call to a git host goes through a client built here so the
//! User-Agent header stays consistent. Requests are never retried.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
