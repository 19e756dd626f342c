// Marco registry push over HTTP

use crate::models::Backend;
use crate::version;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("registry {url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

pub type PushFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PushError>> + Send + 'a>>;

/// Destination for the backends built each cycle.
pub trait RegistryPush: Send + Sync {
    /// Publish the full backend set. All-or-nothing: a failure means nothing
    /// from this cycle is considered published.
    fn send<'a>(&'a self, backends: &'a [Backend]) -> PushFuture<'a>;
}

/// Pooled HTTP client for one Marco registry URL.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    url: String,
}

impl RegistryClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PushError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(version::user_agent())
            .build()
            .map_err(PushError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self, backends), fields(operation = "push", url = %self.url, backends_count = backends.len()))]
    async fn post_backends(&self, backends: &[Backend]) -> Result<(), PushError> {
        let response = self
            .client
            .post(&self.url)
            .json(backends)
            .send()
            .await
            .map_err(|source| PushError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(PushError::Status {
                url: self.url.clone(),
                status,
                body,
            });
        }

        tracing::debug!(status = %status, "Registry accepted backends");
        Ok(())
    }
}

impl RegistryPush for RegistryClient {
    fn send<'a>(&'a self, backends: &'a [Backend]) -> PushFuture<'a> {
        Box::pin(self.post_backends(backends))
    }
}
