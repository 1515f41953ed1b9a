// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::time::Duration;

use blackbeard::{api_key_from_file, ClientConfig, ConfigError, EventKind};
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};

/// Record pirate metrics from the command line.
///
/// Every global flag can also be set through its PIRATE_METRICS_* variable.
#[derive(Parser, Debug)]
#[command(name = "blackbeard", version)]
pub struct Cli {
	/// API key
	#[arg(long, global = true, env = "PIRATE_METRICS_API_KEY", hide_env_values = true)]
	pub api_key: Option<String>,

	/// File holding the API key, used when no key is given directly
	#[arg(long, global = true, env = "PIRATE_METRICS_API_KEY_FILE")]
	pub api_key_file: Option<PathBuf>,

	/// API root URL
	#[arg(long, global = true, env = "PIRATE_METRICS_BASE_URL")]
	pub base_url: Option<String>,

	/// Log every outgoing request
	#[arg(
		long,
		global = true,
		env = "PIRATE_METRICS_DEBUG",
		value_parser = BoolishValueParser::new()
	)]
	pub debug: bool,

	/// Request timeout in seconds
	#[arg(long, global = true, env = "PIRATE_METRICS_TIMEOUT_SECS")]
	pub timeout_secs: Option<u64>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Record a new user
	Acquisition {
		#[arg(long)]
		email: String,
		#[arg(long)]
		level: Option<i64>,
		#[arg(long)]
		occurred_at: Option<String>,
	},
	/// Record a user reaching activation
	Activation {
		#[arg(long)]
		email: String,
		#[arg(long)]
		occurred_at: Option<String>,
	},
	/// Record a returning user
	Retention {
		#[arg(long)]
		email: String,
		#[arg(long)]
		occurred_at: Option<String>,
	},
	/// Record a referral
	Referral {
		#[arg(long)]
		customer_email: String,
		#[arg(long)]
		referree_email: String,
		#[arg(long)]
		occurred_at: Option<String>,
	},
	/// Record a payment
	Revenue {
		#[arg(long)]
		email: String,
		#[arg(long)]
		amount_in_cents: i64,
		#[arg(long)]
		occurred_at: Option<String>,
	},
	/// Send a JSON array of records in one request
	Bulk {
		/// Event kind, e.g. `acquisitions` or `revenue`
		#[arg(long)]
		kind: EventKind,
		/// JSON file to read, `-` for stdin
		#[arg(long)]
		file: PathBuf,
	},
	/// Validate a JSON array of records locally without sending it
	Validate {
		#[arg(long)]
		kind: EventKind,
		#[arg(long)]
		file: PathBuf,
	},
}

impl Cli {
	/// Builds the client configuration from flags and their variables.
	pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
		let mut config = ClientConfig::default().with_debug(self.debug);
		if let Some(key) = &self.api_key {
			config = config.with_api_key(key.as_str());
		} else if let Some(path) = &self.api_key_file {
			config.api_key = Some(api_key_from_file(path)?);
		}
		if let Some(url) = &self.base_url {
			config = config.with_base_url(url.as_str());
		}
		if let Some(secs) = self.timeout_secs {
			config.request_timeout = Duration::from_secs(secs);
		}
		Ok(config)
	}
}
