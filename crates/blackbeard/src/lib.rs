// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust client for the Pirate Metrics API.
//!
//! Records the five pirate metrics (acquisition, activation, retention,
//! referral, revenue) by POSTing JSON to the Pirate Metrics service.
//!
//! # Features
//!
//! - **Per-instance configuration**: API key, base URL and debug logging live
//!   on the client, so several differently configured clients can coexist
//! - **Validation before sending**: records missing a required field are
//!   rejected locally and never reach the network
//! - **All-or-nothing batches**: a batch is sent only if every record validates
//! - **Pluggable transport**: swap the reqwest transport for your own
//!
//! # Example
//!
//! ```ignore
//! use blackbeard::{EventOptions, PirateMetricsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blackbeard::PirateMetricsError> {
//!     let client = PirateMetricsClient::builder()
//!         .api_key("KEY1234567890")
//!         .build()?;
//!
//!     client.revenue("user@example.com", 1999, EventOptions::default()).await?;
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
mod error;
mod transport;

pub use client::{AcquisitionOptions, EventOptions, PirateMetricsClient, PirateMetricsClientBuilder};
pub use config::{api_key_from_file, ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{PirateMetricsError, Result};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

// Re-export core types for convenience
pub use blackbeard_core::{
	validate_acquisition, validate_activation, validate_batch, validate_referral,
	validate_retention, validate_revenue, Acquisition, Activation, ApiKey, BatchRejection, Event,
	EventKind, Referral, Retention, Revenue,
};
