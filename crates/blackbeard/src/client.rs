// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pirate Metrics client for submitting events.

use std::sync::Arc;
use std::time::Duration;

use blackbeard_core::{
	validate_batch, Acquisition, Activation, ApiKey, Event, EventKind, Referral, Retention,
	Revenue, REDACTED,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{PirateMetricsError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "blackbeard-rust";

/// Optional fields of an acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionOptions {
	/// Meta information to track an important numerical value.
	pub level: Option<i64>,
	/// When the acquisition happened.
	pub occurred_at: Option<String>,
}

/// Optional fields shared by activations, retentions, referrals and revenues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOptions {
	/// When the event happened.
	pub occurred_at: Option<String>,
}

impl EventOptions {
	pub fn occurred_at(occurred_at: impl Into<String>) -> Self {
		Self {
			occurred_at: Some(occurred_at.into()),
		}
	}
}

/// Builder for constructing a PirateMetricsClient.
pub struct PirateMetricsClientBuilder {
	config: ClientConfig,
	user_agent: Option<String>,
	transport: Option<Arc<dyn HttpTransport>>,
}

impl PirateMetricsClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			config: ClientConfig::default(),
			user_agent: None,
			transport: None,
		}
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the API key sent with every request.
	pub fn api_key(mut self, key: impl Into<ApiKey>) -> Self {
		self.config.api_key = Some(key.into());
		self
	}

	/// Sets the base URL endpoint names are appended to.
	///
	/// Trailing slashes are trimmed and endpoints are joined with a single
	/// `/`, so `http://h/p-` resolves to `http://h/p-/acquisitions`, never
	/// `http://h/p-acquisitions`.
	///
	/// Example: `http://piratemetrics.com/api/v1/`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.config.base_url = url.into();
		self
	}

	/// Logs every outgoing request when enabled.
	pub fn debug(mut self, debug: bool) -> Self {
		self.config.debug = debug;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Overrides the User-Agent of the default transport.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	/// Uses `transport` instead of the default reqwest transport.
	pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
		self.transport = Some(Arc::new(transport));
		self
	}

	/// Builds the PirateMetricsClient.
	///
	/// The API key is not required here; submissions made without one fail
	/// with [`PirateMetricsError::MissingApiKey`].
	pub fn build(self) -> Result<PirateMetricsClient> {
		let base_url = normalize_base_url(&self.config.base_url)?;

		let transport = match self.transport {
			Some(transport) => transport,
			None => {
				let builder = match self.user_agent {
					Some(user_agent) => blackbeard_common_http::builder_with_user_agent(user_agent),
					None => blackbeard_common_http::builder(),
				};
				let http_client = builder
					.timeout(self.config.request_timeout)
					.build()
					.map_err(PirateMetricsError::RequestFailed)?;
				Arc::new(ReqwestTransport::new(http_client))
			}
		};

		info!(
			base_url = %base_url,
			debug = self.config.debug,
			sdk_name = SDK_NAME,
			sdk_version = SDK_VERSION,
			"Pirate Metrics client initialized"
		);

		Ok(PirateMetricsClient {
			inner: Arc::new(PirateMetricsClientInner {
				config: self.config,
				base_url,
				transport,
			}),
		})
	}
}

impl Default for PirateMetricsClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Trims trailing slashes and checks the URL is http(s).
fn normalize_base_url(raw: &str) -> Result<String> {
	let trimmed = raw.trim().trim_end_matches('/');
	let parsed = Url::parse(trimmed).map_err(|_| PirateMetricsError::InvalidBaseUrl(raw.to_string()))?;
	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(PirateMetricsError::InvalidBaseUrl(raw.to_string()));
	}
	Ok(trimmed.to_string())
}

/// Internal client state.
struct PirateMetricsClientInner {
	config: ClientConfig,
	base_url: String,
	transport: Arc<dyn HttpTransport>,
}

/// Body of every request.
#[derive(Serialize)]
struct RequestPayload<'a> {
	api_key: &'a str,
	data: &'a [Map<String, Value>],
}

/// Client for recording pirate-metric events.
///
/// Every submission returns the response body on HTTP 200 and an error
/// otherwise. Validation and API key checks happen before any request is
/// made.
///
/// # Example
///
/// ```ignore
/// use blackbeard::{AcquisitionOptions, PirateMetricsClient};
///
/// let client = PirateMetricsClient::builder()
///     .api_key("KEY1234567890")
///     .build()?;
///
/// client
///     .acquisition("user@example.com", AcquisitionOptions {
///         level: Some(2),
///         ..Default::default()
///     })
///     .await?;
///
/// client
///     .acquisitions(&[
///         serde_json::json!({"email": "a@example.com"}),
///         serde_json::json!({"email": "b@example.com", "level": 1}),
///     ])
///     .await?;
/// ```
#[derive(Clone)]
pub struct PirateMetricsClient {
	inner: Arc<PirateMetricsClientInner>,
}

impl PirateMetricsClient {
	/// Creates a new builder for constructing a PirateMetricsClient.
	pub fn builder() -> PirateMetricsClientBuilder {
		PirateMetricsClientBuilder::new()
	}

	/// Creates a client with the default transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::builder().config(config).build()
	}

	/// Creates a client configured from `PIRATE_METRICS_*` variables.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}

	/// Returns the client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// Returns the full URL for an endpoint, always joined with one `/`.
	pub fn endpoint_url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.inner.base_url, endpoint)
	}

	/// Sends a single acquisition.
	pub async fn acquisition(
		&self,
		email: impl Into<String>,
		options: AcquisitionOptions,
	) -> Result<String> {
		self.submit(&Acquisition {
			email: email.into(),
			level: options.level,
			occurred_at: options.occurred_at,
		})
		.await
	}

	/// Sends a single activation.
	pub async fn activation(&self, email: impl Into<String>, options: EventOptions) -> Result<String> {
		self.submit(&Activation {
			email: email.into(),
			occurred_at: options.occurred_at,
		})
		.await
	}

	/// Sends a single retention.
	pub async fn retention(&self, email: impl Into<String>, options: EventOptions) -> Result<String> {
		self.submit(&Retention {
			email: email.into(),
			occurred_at: options.occurred_at,
		})
		.await
	}

	/// Sends a single referral of `referree_email` by `customer_email`.
	pub async fn referral(
		&self,
		customer_email: impl Into<String>,
		referree_email: impl Into<String>,
		options: EventOptions,
	) -> Result<String> {
		self.submit(&Referral {
			customer_email: customer_email.into(),
			referree_email: referree_email.into(),
			occurred_at: options.occurred_at,
		})
		.await
	}

	/// Sends a single revenue.
	pub async fn revenue(
		&self,
		email: impl Into<String>,
		amount_in_cents: i64,
		options: EventOptions,
	) -> Result<String> {
		self.submit(&Revenue {
			email: email.into(),
			amount_in_cents,
			occurred_at: options.occurred_at,
		})
		.await
	}

	/// Validates and sends one typed event.
	pub async fn submit<E: Event>(&self, event: &E) -> Result<String> {
		let record = serde_json::to_value(event)?;
		let validated = E::KIND.validate(&record).ok_or_else(|| {
			PirateMetricsError::ValidationFailed(E::KIND.rejection_message().to_string())
		})?;

		self.dispatch(E::KIND.endpoint(), &[validated]).await
	}

	/// Validates and sends several typed events of the same kind in one request.
	pub async fn submit_many<E: Event>(&self, events: &[E]) -> Result<String> {
		let records = events
			.iter()
			.map(serde_json::to_value)
			.collect::<std::result::Result<Vec<_>, _>>()?;

		self.submit_batch(E::KIND, &records).await
	}

	/// Validates every raw record and sends them in one request.
	///
	/// Validation stops at the first invalid record, in which case nothing is
	/// sent. The caller's records are never modified.
	pub async fn submit_batch(&self, kind: EventKind, records: &[Value]) -> Result<String> {
		let validated = validate_batch(kind, records)?;
		self.dispatch(kind.endpoint(), &validated).await
	}

	/// Sends a batch of raw acquisitions.
	pub async fn acquisitions(&self, records: &[Value]) -> Result<String> {
		self.submit_batch(EventKind::Acquisition, records).await
	}

	/// Sends a batch of raw activations.
	pub async fn activations(&self, records: &[Value]) -> Result<String> {
		self.submit_batch(EventKind::Activation, records).await
	}

	/// Sends a batch of raw retentions.
	pub async fn retentions(&self, records: &[Value]) -> Result<String> {
		self.submit_batch(EventKind::Retention, records).await
	}

	/// Sends a batch of raw referrals.
	pub async fn referrals(&self, records: &[Value]) -> Result<String> {
		self.submit_batch(EventKind::Referral, records).await
	}

	/// Sends a batch of raw revenues.
	pub async fn revenues(&self, records: &[Value]) -> Result<String> {
		self.submit_batch(EventKind::Revenue, records).await
	}

	/// POSTs already validated records to `endpoint`.
	///
	/// Fails with [`PirateMetricsError::MissingApiKey`] before touching the
	/// network if no key is configured. Only HTTP 200 counts as success.
	pub async fn dispatch(&self, endpoint: &str, data: &[Map<String, Value>]) -> Result<String> {
		let api_key = self
			.inner
			.config
			.api_key
			.as_ref()
			.filter(|key| !key.is_empty())
			.ok_or(PirateMetricsError::MissingApiKey)?;

		let url = self.endpoint_url(endpoint);
		let body = serde_json::to_string(&RequestPayload {
			api_key: api_key.expose(),
			data,
		})?;

		if self.inner.config.debug {
			let logged = serde_json::to_string(&RequestPayload {
				api_key: REDACTED,
				data,
			})?;
			info!(url = %url, body = %logged, "Pirate Metrics request");
		}

		debug!(endpoint = %endpoint, records = data.len(), "Submitting events");

		let response = self.inner.transport.post(&url, body).await?;
		if response.status != 200 {
			return Err(PirateMetricsError::ServerError {
				status: response.status,
				message: response.body,
			});
		}

		Ok(response.body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::HttpResponse;
	use async_trait::async_trait;
	use serde_json::json;
	use std::sync::Mutex;

	#[derive(Debug, Clone)]
	struct SentRequest {
		url: String,
		body: Value,
	}

	/// Records every request and answers with a fixed response.
	#[derive(Clone)]
	struct FakeTransport {
		sent: Arc<Mutex<Vec<SentRequest>>>,
		response: HttpResponse,
	}

	impl FakeTransport {
		fn new(status: u16, body: &str) -> Self {
			Self {
				sent: Arc::new(Mutex::new(Vec::new())),
				response: HttpResponse {
					status,
					body: body.to_string(),
				},
			}
		}

		fn ok() -> Self {
			Self::new(200, "OK")
		}

		fn requests(&self) -> Vec<SentRequest> {
			self.sent.lock().unwrap().clone()
		}
	}

	#[async_trait]
	impl HttpTransport for FakeTransport {
		async fn post(&self, url: &str, body: String) -> Result<HttpResponse> {
			self.sent.lock().unwrap().push(SentRequest {
				url: url.to_string(),
				body: serde_json::from_str(&body).unwrap(),
			});
			Ok(self.response.clone())
		}
	}

	fn client_with(transport: &FakeTransport) -> PirateMetricsClient {
		PirateMetricsClient::builder()
			.api_key("KEY1234567890")
			.base_url("http://localhost:9001/")
			.transport(transport.clone())
			.build()
			.unwrap()
	}

	#[test]
	fn test_builder_rejects_invalid_base_url() {
		for url in ["", "not a url", "ftp://example.com/"] {
			let result = PirateMetricsClient::builder().base_url(url).build();
			assert!(
				matches!(result, Err(PirateMetricsError::InvalidBaseUrl(_))),
				"accepted {url:?}"
			);
		}
	}

	#[test]
	fn test_builder_normalizes_base_url() {
		let client = PirateMetricsClient::builder()
			.base_url("https://example.com/api/v1//")
			.build()
			.unwrap();

		assert_eq!(
			client.endpoint_url("revenues"),
			"https://example.com/api/v1/revenues"
		);
	}

	#[test]
	fn test_endpoint_is_joined_with_slash() {
		let client = PirateMetricsClient::builder()
			.base_url("http://h/p-")
			.build()
			.unwrap();

		assert_eq!(client.endpoint_url("acquisitions"), "http://h/p-/acquisitions");
	}

	#[test]
	fn test_default_endpoint_url() {
		let client = PirateMetricsClient::new(ClientConfig::default()).unwrap();
		assert_eq!(
			client.endpoint_url("acquisitions"),
			"http://piratemetrics.com/api/v1/acquisitions"
		);
	}

	#[tokio::test]
	async fn test_single_acquisition_sends_one_element_array() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		let result = client
			.acquisition(
				"a@b.com",
				AcquisitionOptions {
					level: Some(1),
					occurred_at: None,
				},
			)
			.await
			.unwrap();
		assert_eq!(result, "OK");

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, "http://localhost:9001/acquisitions");
		assert_eq!(
			requests[0].body,
			json!({"api_key": "KEY1234567890", "data": [{"email": "a@b.com", "level": 1}]})
		);
	}

	#[tokio::test]
	async fn test_each_kind_posts_to_its_endpoint() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		client
			.activation("a@b.com", EventOptions::occurred_at("DATE"))
			.await
			.unwrap();
		client
			.retention("a@b.com", EventOptions::default())
			.await
			.unwrap();
		client
			.referral("a@b.com", "c@d.com", EventOptions::default())
			.await
			.unwrap();
		client
			.revenue("a@b.com", 1999, EventOptions::default())
			.await
			.unwrap();

		let requests = transport.requests();
		let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
		assert_eq!(
			urls,
			vec![
				"http://localhost:9001/activations",
				"http://localhost:9001/retentions",
				"http://localhost:9001/referrals",
				"http://localhost:9001/revenues",
			]
		);
		assert_eq!(
			requests[0].body["data"],
			json!([{"email": "a@b.com", "occurred_at": "DATE"}])
		);
		assert_eq!(
			requests[2].body["data"],
			json!([{"customer_email": "a@b.com", "referree_email": "c@d.com"}])
		);
		assert_eq!(
			requests[3].body["data"],
			json!([{"email": "a@b.com", "amount_in_cents": 1999}])
		);
	}

	#[tokio::test]
	async fn test_missing_api_key_makes_no_request() {
		let transport = FakeTransport::ok();
		let client = PirateMetricsClient::builder()
			.transport(transport.clone())
			.build()
			.unwrap();

		let result = client
			.acquisition("a@b.com", AcquisitionOptions::default())
			.await;

		assert!(matches!(result, Err(PirateMetricsError::MissingApiKey)));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_empty_api_key_makes_no_request() {
		let transport = FakeTransport::ok();
		let client = PirateMetricsClient::builder()
			.api_key("")
			.transport(transport.clone())
			.build()
			.unwrap();

		let result = client.acquisitions(&[json!({"email": "a@b.com"})]).await;

		assert!(matches!(result, Err(PirateMetricsError::MissingApiKey)));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_validation_is_checked_before_api_key() {
		let transport = FakeTransport::ok();
		let client = PirateMetricsClient::builder()
			.transport(transport.clone())
			.build()
			.unwrap();

		let result = client.revenues(&[json!({"email": "a@b.com"})]).await;

		assert!(matches!(result, Err(PirateMetricsError::ValidationFailed(_))));
	}

	/// A caller-defined event whose shape does not satisfy its schema.
	#[derive(Serialize)]
	struct PartialReferral {
		customer_email: String,
	}

	impl Event for PartialReferral {
		const KIND: EventKind = EventKind::Referral;
	}

	#[tokio::test]
	async fn test_custom_event_failing_schema_reports_rejection_message() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		let result = client
			.submit(&PartialReferral {
				customer_email: "a@b.com".to_string(),
			})
			.await;

		match result {
			Err(PirateMetricsError::ValidationFailed(message)) => {
				assert_eq!(message, EventKind::Referral.rejection_message());
			}
			other => panic!("expected validation failure, got {other:?}"),
		}
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_bulk_of_valid_records_is_one_request() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		let records = vec![
			json!({"email": "1@example.com"}),
			json!({"email": "2@example.com"}),
			json!({"email": "3@example.com"}),
			json!({"email": "4@example.com"}),
		];
		let result = client.acquisitions(&records).await.unwrap();
		assert_eq!(result, "OK");

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].body["data"], Value::Array(records));
	}

	#[tokio::test]
	async fn test_bulk_with_one_invalid_record_sends_nothing() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		let records = vec![
			json!({"email": "1@example.com"}),
			json!({"email": "2@example.com"}),
			json!({"email": 3}),
			json!({"email": "4@example.com"}),
		];
		let before = records.clone();

		let result = client.acquisitions(&records).await;

		match result {
			Err(PirateMetricsError::ValidationFailed(message)) => {
				assert!(message.contains("index 2"), "unexpected message: {message}");
			}
			other => panic!("expected validation failure, got {other:?}"),
		}
		assert!(transport.requests().is_empty());
		assert_eq!(records, before);
	}

	#[tokio::test]
	async fn test_bulk_sends_sanitized_records() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		client
			.referrals(&[json!({
				"customer_email": "a@b.com",
				"referree_email": "c@d.com",
				"occurred_at": 12
			})])
			.await
			.unwrap();

		assert_eq!(
			transport.requests()[0].body["data"],
			json!([{"customer_email": "a@b.com", "referree_email": "c@d.com"}])
		);
	}

	#[tokio::test]
	async fn test_submit_many_typed_events() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		client
			.submit_many(&[
				Revenue::new("a@b.com", 100),
				Revenue::new("c@d.com", 250).with_occurred_at("DATE"),
			])
			.await
			.unwrap();

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url, "http://localhost:9001/revenues");
		assert_eq!(
			requests[0].body["data"],
			json!([
				{"email": "a@b.com", "amount_in_cents": 100},
				{"email": "c@d.com", "amount_in_cents": 250, "occurred_at": "DATE"}
			])
		);
	}

	#[tokio::test]
	async fn test_non_200_status_is_an_error() {
		for status in [201, 400, 500] {
			let transport = FakeTransport::new(status, "nope");
			let client = client_with(&transport);

			let result = client.retention("a@b.com", EventOptions::default()).await;

			match result {
				Err(PirateMetricsError::ServerError { status: got, message }) => {
					assert_eq!(got, status);
					assert_eq!(message, "nope");
				}
				other => panic!("expected server error for {status}, got {other:?}"),
			}
		}
	}

	#[tokio::test]
	async fn test_debug_does_not_change_outcome() {
		let transport = FakeTransport::ok();
		let client = PirateMetricsClient::builder()
			.api_key("KEY1234567890")
			.debug(true)
			.transport(transport.clone())
			.build()
			.unwrap();

		let result = client
			.activation("a@b.com", EventOptions::default())
			.await
			.unwrap();

		assert_eq!(result, "OK");
		assert_eq!(transport.requests().len(), 1);
	}

	#[tokio::test]
	async fn test_concurrent_submissions_are_independent() {
		let transport = FakeTransport::ok();
		let client = client_with(&transport);

		let handles: Vec<_> = (0..8)
			.map(|i| {
				let client = client.clone();
				tokio::spawn(async move {
					client
						.acquisition(format!("{i}@example.com"), AcquisitionOptions::default())
						.await
				})
			})
			.collect();

		for handle in handles {
			assert_eq!(handle.await.unwrap().unwrap(), "OK");
		}
		assert_eq!(transport.requests().len(), 8);
	}
}
