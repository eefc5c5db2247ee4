//! Transport for recommendation requests.
//!
//! Whatever happens on the wire, callers get a [`Payload`] back: failures
//! are collapsed into [`TRANSPORT_ERROR_MESSAGE`] text.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use plans4you_common::Plans4YouConfig;
use plans4you_protocol::{HealthcareFormValues, Payload};
use std::time::Duration;

pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Sorry, we encountered an error processing your request.";

#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch(&self, form: &HealthcareFormValues) -> Payload;
}

pub struct HttpRecommendationClient {
    http: reqwest::Client,
    endpoint: String,
    delay: Duration,
}

impl HttpRecommendationClient {
    pub fn new(config: &Plans4YouConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            delay: config.response_delay(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_fetch(&self, form: &HealthcareFormValues) -> Result<Payload> {
        tracing::debug!(
            "Request Body: {}",
            serde_json::to_string(form).unwrap_or_default()
        );
        let resp = self
            .http
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(form)
            .send()
            .await?;

        let status = resp.status();
        tracing::info!("Response status: {status}");
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(anyhow!("recommendation endpoint http {status}: {body}"));
        }
        Ok(Payload::from_body(&body))
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommendationClient {
    async fn fetch(&self, form: &HealthcareFormValues) -> Payload {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.try_fetch(form).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Error fetching recommendations: {e}");
                Payload::Text(TRANSPORT_ERROR_MESSAGE.to_string())
            }
        }
    }
}

/// Replays one fixed payload for every request.
pub struct StaticSource {
    payload: Payload,
}

impl StaticSource {
    pub fn new(payload: Payload) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl RecommendationSource for StaticSource {
    async fn fetch(&self, _form: &HealthcareFormValues) -> Payload {
        self.payload.clone()
    }
}
