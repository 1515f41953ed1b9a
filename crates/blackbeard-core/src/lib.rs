// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Core types for the Pirate Metrics client.
//!
//! This crate provides:
//! - [`EventKind`]: the five pirate-metric event kinds and their endpoints
//! - Typed event records ([`Acquisition`], [`Activation`], [`Retention`],
//!   [`Referral`], [`Revenue`])
//! - Validators that sanitize or reject raw JSON records
//! - [`ApiKey`]: a wrapper that keeps the API key out of logs

pub mod api_key;
pub mod event;
pub mod validate;

pub use api_key::{ApiKey, REDACTED};
pub use event::{
	Acquisition, Activation, Event, EventKind, ParseEventKindError, Referral, Retention, Revenue,
};
pub use validate::{
	validate_acquisition, validate_activation, validate_batch, validate_referral,
	validate_retention, validate_revenue, BatchRejection, Field, FieldType, Schema,
};
