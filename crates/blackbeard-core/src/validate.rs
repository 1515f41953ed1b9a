// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation of raw event records.
//!
//! A validator takes a raw JSON record and either returns a sanitized copy or
//! `None`. Required fields must be present with the exact JSON type; optional
//! fields with the wrong type are dropped. Fields outside the schema pass
//! through untouched. The input is never modified.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::event::EventKind;

/// The JSON type a field must have. No coercion is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
	String,
	Number,
}

impl FieldType {
	/// Returns true if `value` has exactly this type.
	pub fn matches(&self, value: &Value) -> bool {
		match self {
			FieldType::String => value.is_string(),
			FieldType::Number => value.is_number(),
		}
	}
}

/// A named, typed field in an event schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
	pub name: &'static str,
	pub ty: FieldType,
}

impl Field {
	const fn string(name: &'static str) -> Self {
		Self {
			name,
			ty: FieldType::String,
		}
	}

	const fn number(name: &'static str) -> Self {
		Self {
			name,
			ty: FieldType::Number,
		}
	}
}

/// Required and optional fields for one event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
	pub required: &'static [Field],
	pub optional: &'static [Field],
}

const OCCURRED_AT: Field = Field::string("occurred_at");

static ACQUISITION: Schema = Schema {
	required: &[Field::string("email")],
	optional: &[Field::number("level"), OCCURRED_AT],
};

static ACTIVATION: Schema = Schema {
	required: &[Field::string("email")],
	optional: &[OCCURRED_AT],
};

static RETENTION: Schema = Schema {
	required: &[Field::string("email")],
	optional: &[OCCURRED_AT],
};

static REFERRAL: Schema = Schema {
	required: &[Field::string("customer_email"), Field::string("referree_email")],
	optional: &[OCCURRED_AT],
};

static REVENUE: Schema = Schema {
	required: &[Field::string("email"), Field::number("amount_in_cents")],
	optional: &[OCCURRED_AT],
};

impl Schema {
	/// Validates `record` against this schema.
	///
	/// Returns `None` if the record is not an object or any required field is
	/// missing or mistyped.
	pub fn validate(&self, record: &Value) -> Option<Map<String, Value>> {
		let fields = record.as_object()?;

		let required_ok = self.required.iter().all(|field| {
			fields
				.get(field.name)
				.is_some_and(|value| field.ty.matches(value))
		});
		if !required_ok {
			return None;
		}

		let mut sanitized = fields.clone();
		for field in self.optional {
			if sanitized
				.get(field.name)
				.is_some_and(|value| !field.ty.matches(value))
			{
				sanitized.remove(field.name);
			}
		}

		Some(sanitized)
	}
}

impl EventKind {
	/// Returns the field schema for this kind.
	pub fn schema(&self) -> &'static Schema {
		match self {
			EventKind::Acquisition => &ACQUISITION,
			EventKind::Activation => &ACTIVATION,
			EventKind::Retention => &RETENTION,
			EventKind::Referral => &REFERRAL,
			EventKind::Revenue => &REVENUE,
		}
	}

	/// Validates a raw record of this kind. See [`Schema::validate`].
	pub fn validate(&self, record: &Value) -> Option<Map<String, Value>> {
		self.schema().validate(record)
	}
}

pub fn validate_acquisition(record: &Value) -> Option<Map<String, Value>> {
	EventKind::Acquisition.validate(record)
}

pub fn validate_activation(record: &Value) -> Option<Map<String, Value>> {
	EventKind::Activation.validate(record)
}

pub fn validate_retention(record: &Value) -> Option<Map<String, Value>> {
	EventKind::Retention.validate(record)
}

pub fn validate_referral(record: &Value) -> Option<Map<String, Value>> {
	EventKind::Referral.validate(record)
}

pub fn validate_revenue(record: &Value) -> Option<Map<String, Value>> {
	EventKind::Revenue.validate(record)
}

/// The first record in a batch that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unable to validate {kind} record at index {index}")]
pub struct BatchRejection {
	pub kind: EventKind,
	pub index: usize,
}

/// Validates every record of a batch, stopping at the first invalid one.
pub fn validate_batch(
	kind: EventKind,
	records: &[Value],
) -> Result<Vec<Map<String, Value>>, BatchRejection> {
	records
		.iter()
		.enumerate()
		.map(|(index, record)| kind.validate(record).ok_or(BatchRejection { kind, index }))
		.collect()
}
