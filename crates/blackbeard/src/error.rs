// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Pirate Metrics client.

use blackbeard_core::BatchRejection;
use thiserror::Error;

use crate::config::ConfigError;

/// Pirate Metrics client errors.
#[derive(Debug, Error)]
pub enum PirateMetricsError {
	/// No API key is configured. Raised before any network access.
	#[error("API key required")]
	MissingApiKey,

	/// Base URL is empty or not an http(s) URL.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// One or more required fields were missing or mistyped. Nothing was sent.
	#[error("event validation failed: {0}")]
	ValidationFailed(String),

	/// The transport failed before a response was received.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// The server answered with a status other than 200.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Serialization error.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// Configuration could not be loaded.
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),
}

impl From<BatchRejection> for PirateMetricsError {
	fn from(rejection: BatchRejection) -> Self {
		PirateMetricsError::ValidationFailed(rejection.to_string())
	}
}

/// Result type alias for Pirate Metrics operations.
pub type Result<T> = std::result::Result<T, PirateMetricsError>;

#[cfg(test)]
mod tests {
	use super::*;
	use blackbeard_core::EventKind;

	#[test]
	fn test_batch_rejection_becomes_validation_error() {
		let err = PirateMetricsError::from(BatchRejection {
			kind: EventKind::Acquisition,
			index: 2,
		});
		assert!(matches!(err, PirateMetricsError::ValidationFailed(_)));
		assert_eq!(
			err.to_string(),
			"event validation failed: unable to validate acquisition record at index 2"
		);
	}

	#[test]
	fn test_server_error_message() {
		let err = PirateMetricsError::ServerError {
			status: 401,
			message: "API key is not valid.".to_string(),
		};
		assert_eq!(err.to_string(), "server error (401): API key is not valid.");
	}

	#[test]
	fn test_missing_api_key_message() {
		assert_eq!(
			PirateMetricsError::MissingApiKey.to_string(),
			"API key required"
		);
	}
}
