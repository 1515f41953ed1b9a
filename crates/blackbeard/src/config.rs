// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration.
//!
//! A [`ClientConfig`] is owned by each client instance. It can be built by
//! hand, through [`crate::PirateMetricsClientBuilder`], or loaded from the
//! environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PIRATE_METRICS_API_KEY` | API key |
//! | `PIRATE_METRICS_API_KEY_FILE` | Path to a file holding the API key |
//! | `PIRATE_METRICS_BASE_URL` | API root, defaults to [`DEFAULT_BASE_URL`] |
//! | `PIRATE_METRICS_DEBUG` | Log outgoing requests (`1`, `true`, `yes`, `on`) |
//! | `PIRATE_METRICS_TIMEOUT_SECS` | Request timeout in seconds |

use std::path::PathBuf;
use std::time::Duration;

use blackbeard_core::ApiKey;
use thiserror::Error;

/// Production root of the Pirate Metrics API.
pub const DEFAULT_BASE_URL: &str = "http://piratemetrics.com/api/v1/";

/// Timeout applied to each HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "PIRATE_METRICS_API_KEY";
pub const ENV_API_KEY_FILE: &str = "PIRATE_METRICS_API_KEY_FILE";
pub const ENV_BASE_URL: &str = "PIRATE_METRICS_BASE_URL";
pub const ENV_DEBUG: &str = "PIRATE_METRICS_DEBUG";
pub const ENV_TIMEOUT_SECS: &str = "PIRATE_METRICS_TIMEOUT_SECS";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The `*_FILE` variable pointed at an unreadable file.
	#[error("failed to read {var} from {}: {source}", .path.display())]
	SecretFile {
		var: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A variable held a value that could not be parsed.
	#[error("invalid value for {var}: {message}")]
	InvalidValue { var: &'static str, message: String },
}

/// Configuration for a Pirate Metrics client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// API key sent with every request. Submissions fail without one.
	pub api_key: Option<ApiKey>,
	/// Root URL that endpoint names are appended to.
	pub base_url: String,
	/// When true, every outgoing request is logged before it is sent.
	pub debug: bool,
	/// Timeout for HTTP requests.
	pub request_timeout: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			base_url: DEFAULT_BASE_URL.to_string(),
			debug: false,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl ClientConfig {
	/// Loads configuration from process environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads configuration using `lookup` to resolve variable names.
	///
	/// `PIRATE_METRICS_API_KEY` takes precedence over
	/// `PIRATE_METRICS_API_KEY_FILE`. Unset or empty variables keep their
	/// defaults.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let mut config = Self::default();

		if let Some(key) = get(ENV_API_KEY) {
			config.api_key = Some(ApiKey::new(key));
		} else if let Some(path) = get(ENV_API_KEY_FILE) {
			config.api_key = Some(api_key_from_file(path)?);
		}

		if let Some(base_url) = get(ENV_BASE_URL) {
			config.base_url = base_url;
		}

		if let Some(debug) = get(ENV_DEBUG) {
			config.debug = parse_bool(ENV_DEBUG, &debug)?;
		}

		if let Some(secs) = get(ENV_TIMEOUT_SECS) {
			let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
				var: ENV_TIMEOUT_SECS,
				message: format!("{e}"),
			})?;
			config.request_timeout = Duration::from_secs(secs);
		}

		Ok(config)
	}

	/// Sets the API key.
	pub fn with_api_key(mut self, key: impl Into<ApiKey>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the base URL.
	pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();
		self
	}

	/// Enables or disables request logging.
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}
}

/// Reads an API key from `path`, trimming surrounding whitespace.
pub fn api_key_from_file(path: impl Into<PathBuf>) -> Result<ApiKey, ConfigError> {
	let path = path.into();
	let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::SecretFile {
		var: ENV_API_KEY_FILE,
		path: path.clone(),
		source,
	})?;
	Ok(ApiKey::new(contents.trim()))
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		other => Err(ConfigError::InvalidValue {
			var,
			message: format!("expected a boolean, got '{other}'"),
		}),
	}
}
