// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::USER_AGENT;
use crate::content::html::inject_base_tag;
use crate::error::{DummySiteError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Source of the HTML served for a DummySite
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the page at `url`, ready to be served from a different origin.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP(S), following redirects
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::from_builder(client_builder(timeout))
    }

    fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
        Ok(Self {
            client: builder.build()?,
        })
    }
}

fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout)
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| DummySiteError::FetchError {
            url: url.to_string(),
            reason: format!("invalid URL: {}", e),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DummySiteError::FetchError {
                url: url.to_string(),
                reason: format!(
                    "{} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                ),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(inject_base_tag(&body, url))
    }
}
