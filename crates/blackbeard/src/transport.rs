// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP transport abstraction.
//!
//! The client only needs to POST a JSON body and read back the status and
//! body. [`ReqwestTransport`] is the default; tests and embedders can supply
//! their own [`HttpTransport`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::error::Result;

/// Status and body of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

/// Issues HTTP POST requests on behalf of the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
	/// POSTs `body` as `application/json` to `url`.
	///
	/// Returns `Err` only when no response was received.
	async fn post(&self, url: &str, body: String) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: Client,
}

impl ReqwestTransport {
	pub fn new(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn post(&self, url: &str, body: String) -> Result<HttpResponse> {
		let response = self
			.client
			.post(url)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await?;

		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(HttpResponse { status, body })
	}
}
