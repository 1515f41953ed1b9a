// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key wrapper for authenticating with Pirate Metrics.
//!
//! The key is sent in the body of every request, so it must never end up in
//! logs. [`ApiKey`] prints as [`REDACTED`] through both `Debug` and `Display`;
//! the raw value is only reachable through [`ApiKey::expose`]. The backing
//! buffer is zeroized when the key is dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder printed in place of secret values.
pub const REDACTED: &str = "[REDACTED]";

/// A Pirate Metrics API key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Returns the raw key.
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl std::fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("ApiKey").field(&REDACTED).finish()
	}
}

impl std::fmt::Display for ApiKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(REDACTED)
	}
}

impl From<String> for ApiKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}

impl From<&str> for ApiKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}
