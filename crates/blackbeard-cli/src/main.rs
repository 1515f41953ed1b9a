// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod cli;
mod commands;

use anyhow::Context;
use blackbeard::PirateMetricsClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Filter used when `RUST_LOG` is unset.
fn log_filter(debug: bool) -> &'static str {
	if debug {
		"info,blackbeard=debug"
	} else {
		"info"
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = cli.client_config().context("failed to load configuration")?;

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new(log_filter(config.debug))),
		)
		.with_writer(std::io::stderr)
		.init();

	let client = PirateMetricsClient::new(config)?;

	let output = commands::run(cli.command, &client).await?;
	println!("{output}");

	Ok(())
}
