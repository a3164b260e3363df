use std::time::Duration;

use async_trait::async_trait;
use models::documents::user::User;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::services::config::DirectoryConfig;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Invalid directory URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Directory returned unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Lookup of user documents by id.
///
/// The directory is externally owned; this layer only ever reads from it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches a user document. `Ok(None)` means the id resolves to nothing,
    /// which callers treat as a silent skip rather than a failure.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DirectoryError>;
}

/// `UserDirectory` backed by the document store's REST gateway.
pub struct HttpUserDirectory {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl HttpUserDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        // Url::join treats a base without a trailing slash as a file path
        // and would drop its last segment.
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            base_url: Url::parse(&base_url)?,
            auth_token: config.auth_token.clone().map(SecretString::from),
        })
    }

    fn user_url(&self, user_id: &str) -> Result<Url, DirectoryError> {
        Ok(self.base_url.join(&format!("users/{user_id}"))?)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DirectoryError> {
        let mut request = self.http.get(self.user_url(user_id)?);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<User>().await?)),
            status => Err(DirectoryError::UnexpectedStatus(status)),
        }
    }
}
