use std::time::Duration;

use async_trait::async_trait;
use models::documents::notification::NotificationRequest;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::services::config::PushConfig;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("Invalid push gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Push gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Push gateway rejected the request: {0}")]
    Rejected(StatusCode),
    #[error("Push gateway reported delivery failure: {0}")]
    Delivery(String),
}

/// Outbound push delivery.
///
/// One call per notification; any retry policy belongs to the hosting
/// platform, not to implementations of this trait.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, request: &NotificationRequest) -> Result<(), PushError>;
}

/// FCM downstream message envelope.
#[derive(Debug, Serialize)]
struct DownstreamMessage<'a> {
    to: &'a str,
    notification: NotificationPayload<'a>,
}

#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    title: &'a str,
    body: &'a str,
}

/// The subset of the gateway response we act on. A 200 can still carry a
/// per-message delivery failure.
#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    failure: u32,
    #[serde(default)]
    results: Vec<SendResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SendResult {
    #[serde(default)]
    error: Option<String>,
}

/// `PushSender` backed by the FCM HTTP API.
pub struct FcmClient {
    http: reqwest::Client,
    endpoint: Url,
    server_key: SecretString,
}

impl FcmClient {
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: Url::parse(&config.endpoint)?,
            server_key: SecretString::from(config.server_key.clone()),
        })
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, request: &NotificationRequest) -> Result<(), PushError> {
        let message = DownstreamMessage {
            to: &request.token,
            notification: NotificationPayload {
                title: &request.title,
                body: &request.body,
            },
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.server_key.expose_secret()),
            )
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::Rejected(status));
        }

        let body: SendResponse = response.json().await?;
        if body.failure > 0 {
            let detail = body
                .results
                .into_iter()
                .find_map(|r| r.error)
                .unwrap_or_else(|| "unspecified gateway error".to_string());
            return Err(PushError::Delivery(detail));
        }

        Ok(())
    }
}
