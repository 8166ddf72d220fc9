use sponsorscout_api::{FeedError, GitHubError};
use thiserror::Error;

/// All the ways things can go wrong in SponsorScout
///
/// Note that the filter engine itself never fails - everything here comes
/// from loading the feed, talking to GitHub, or reading config.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Feed error: {0}")]
    FeedError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Set GITHUB_ACCESS_TOKEN to raise the limit")]
    RateLimitExceeded,

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<GitHubError> for Error {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::NotFound(name) => Error::NotFound(name),
            GitHubError::RateLimitExceeded => Error::RateLimitExceeded,
            GitHubError::AuthFailed => Error::AuthError("check your GitHub token".into()),
            other => Error::ApiError(other.to_string()),
        }
    }
}

impl From<FeedError> for Error {
    fn from(err: FeedError) -> Self {
        Error::FeedError(err.to_string())
    }
}
