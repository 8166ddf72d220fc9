// Raw download of the sponsorship feed (a small CSV file somewhere on the web)
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed request failed with status {status}")]
    BadStatus { status: u16 },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl Retryable for FeedError {
    fn is_retryable(&self) -> bool {
        match self {
            FeedError::BadStatus { status } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            FeedError::NetworkError(e) => !e.is_decode(),
        }
    }
}

pub struct FeedClient {
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl FeedClient {
    pub fn new(retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("SponsorScout/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            retry_config,
        }
    }

    /// Fetch the feed body as text
    pub async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        debug!("Fetching sponsorship feed from {}", url);

        with_retry(&self.retry_config, || async {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(FeedError::BadStatus {
                    status: status.as_u16(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
