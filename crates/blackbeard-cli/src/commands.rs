// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand execution.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use blackbeard::{validate_batch, AcquisitionOptions, EventOptions, PirateMetricsClient};
use serde_json::Value;
use tracing::debug;

use crate::cli::Command;

/// Runs `command` and returns the text to print on success.
pub async fn run(command: Command, client: &PirateMetricsClient) -> anyhow::Result<String> {
	let body = match command {
		Command::Acquisition {
			email,
			level,
			occurred_at,
		} => {
			client
				.acquisition(email, AcquisitionOptions { level, occurred_at })
				.await?
		}
		Command::Activation { email, occurred_at } => {
			client
				.activation(email, EventOptions { occurred_at })
				.await?
		}
		Command::Retention { email, occurred_at } => {
			client
				.retention(email, EventOptions { occurred_at })
				.await?
		}
		Command::Referral {
			customer_email,
			referree_email,
			occurred_at,
		} => {
			client
				.referral(customer_email, referree_email, EventOptions { occurred_at })
				.await?
		}
		Command::Revenue {
			email,
			amount_in_cents,
			occurred_at,
		} => {
			client
				.revenue(email, amount_in_cents, EventOptions { occurred_at })
				.await?
		}
		Command::Bulk { kind, file } => {
			let records = read_records(&file)?;
			debug!(kind = %kind, count = records.len(), "Sending bulk records");
			client.submit_batch(kind, &records).await?
		}
		Command::Validate { kind, file } => {
			let records = read_records(&file)?;
			let validated = validate_batch(kind, &records)?;
			serde_json::to_string_pretty(&validated)?
		}
	};

	Ok(body)
}

/// Reads a JSON array of records from `path`, or stdin when `path` is `-`.
pub fn read_records(path: &Path) -> anyhow::Result<Vec<Value>> {
	let contents = if path.as_os_str() == "-" {
		let mut buf = String::new();
		std::io::stdin()
			.read_to_string(&mut buf)
			.context("failed to read records from stdin")?;
		buf
	} else {
		std::fs::read_to_string(path)
			.with_context(|| format!("failed to read {}", path.display()))?
	};

	match serde_json::from_str::<Value>(&contents)
		.with_context(|| format!("{} is not valid JSON", path.display()))?
	{
		Value::Array(records) => Ok(records),
		_ => bail!("{} must contain a JSON array of records", path.display()),
	}
}
