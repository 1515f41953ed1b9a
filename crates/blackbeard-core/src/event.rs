// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event kinds and typed event records.
//!
//! Every record is sent to the endpoint named after its kind:
//!
//! | Kind | Endpoint | Required | Optional |
//! |------|----------|----------|----------|
//! | Acquisition | `acquisitions` | `email` | `level`, `occurred_at` |
//! | Activation | `activations` | `email` | `occurred_at` |
//! | Retention | `retentions` | `email` | `occurred_at` |
//! | Referral | `referrals` | `customer_email`, `referree_email` | `occurred_at` |
//! | Revenue | `revenues` | `email`, `amount_in_cents` | `occurred_at` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a pirate-metric event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
	Acquisition,
	Activation,
	Retention,
	Referral,
	Revenue,
}

impl EventKind {
	/// All event kinds, in funnel order.
	pub const ALL: [EventKind; 5] = [
		EventKind::Acquisition,
		EventKind::Activation,
		EventKind::Retention,
		EventKind::Referral,
		EventKind::Revenue,
	];

	/// Returns the singular name ("acquisition", "revenue", ...).
	pub fn as_str(&self) -> &'static str {
		match self {
			EventKind::Acquisition => "acquisition",
			EventKind::Activation => "activation",
			EventKind::Retention => "retention",
			EventKind::Referral => "referral",
			EventKind::Revenue => "revenue",
		}
	}

	/// Returns the API path segment records of this kind are posted to.
	pub fn endpoint(&self) -> &'static str {
		match self {
			EventKind::Acquisition => "acquisitions",
			EventKind::Activation => "activations",
			EventKind::Retention => "retentions",
			EventKind::Referral => "referrals",
			EventKind::Revenue => "revenues",
		}
	}

	/// Message reported when a single record of this kind fails validation.
	///
	/// The typed records in this crate always satisfy their schema, so this is
	/// only reached through caller-defined [`Event`] implementations.
	pub fn rejection_message(&self) -> &'static str {
		match self {
			EventKind::Acquisition | EventKind::Activation | EventKind::Retention => {
				"at least email is required"
			}
			EventKind::Referral => "customer and referree emails are required",
			EventKind::Revenue => "email and an amount in cents are required",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Error returned when parsing an unknown event kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind '{0}'")]
pub struct ParseEventKindError(pub String);

impl std::str::FromStr for EventKind {
	type Err = ParseEventKindError;

	/// Accepts both the singular name and the endpoint name.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();
		EventKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == normalized || kind.endpoint() == normalized)
			.ok_or_else(|| ParseEventKindError(s.to_string()))
	}
}

/// A typed event record that knows which endpoint it belongs to.
pub trait Event: Serialize {
	const KIND: EventKind;
}

/// A new user was acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
	pub email: String,
	/// Meta information to track an important numerical value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occurred_at: Option<String>,
}

impl Acquisition {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			level: None,
			occurred_at: None,
		}
	}

	pub fn with_level(mut self, level: i64) -> Self {
		self.level = Some(level);
		self
	}

	pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
		self.occurred_at = Some(occurred_at.into());
		self
	}

	/// Sets `occurred_at` from a timestamp, formatted as RFC 3339.
	pub fn with_occurred_at_time(self, at: DateTime<Utc>) -> Self {
		self.with_occurred_at(at.to_rfc3339())
	}
}

impl Event for Acquisition {
	const KIND: EventKind = EventKind::Acquisition;
}

/// A user reached the activation milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occurred_at: Option<String>,
}

impl Activation {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			occurred_at: None,
		}
	}

	pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
		self.occurred_at = Some(occurred_at.into());
		self
	}

	pub fn with_occurred_at_time(self, at: DateTime<Utc>) -> Self {
		self.with_occurred_at(at.to_rfc3339())
	}
}

impl Event for Activation {
	const KIND: EventKind = EventKind::Activation;
}

/// A user performed a key event again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retention {
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occurred_at: Option<String>,
}

impl Retention {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			occurred_at: None,
		}
	}

	pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
		self.occurred_at = Some(occurred_at.into());
		self
	}

	pub fn with_occurred_at_time(self, at: DateTime<Utc>) -> Self {
		self.with_occurred_at(at.to_rfc3339())
	}
}

impl Event for Retention {
	const KIND: EventKind = EventKind::Retention;
}

/// An existing customer referred a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
	/// Email of the referrer.
	pub customer_email: String,
	/// Email of the new customer.
	pub referree_email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occurred_at: Option<String>,
}

impl Referral {
	pub fn new(customer_email: impl Into<String>, referree_email: impl Into<String>) -> Self {
		Self {
			customer_email: customer_email.into(),
			referree_email: referree_email.into(),
			occurred_at: None,
		}
	}

	pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
		self.occurred_at = Some(occurred_at.into());
		self
	}

	pub fn with_occurred_at_time(self, at: DateTime<Utc>) -> Self {
		self.with_occurred_at(at.to_rfc3339())
	}
}

impl Event for Referral {
	const KIND: EventKind = EventKind::Referral;
}

/// A payment was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revenue {
	pub email: String,
	pub amount_in_cents: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub occurred_at: Option<String>,
}

impl Revenue {
	pub fn new(email: impl Into<String>, amount_in_cents: i64) -> Self {
		Self {
			email: email.into(),
			amount_in_cents,
			occurred_at: None,
		}
	}

	pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
		self.occurred_at = Some(occurred_at.into());
		self
	}

	pub fn with_occurred_at_time(self, at: DateTime<Utc>) -> Self {
		self.with_occurred_at(at.to_rfc3339())
	}
}

impl Event for Revenue {
	const KIND: EventKind = EventKind::Revenue;
}
