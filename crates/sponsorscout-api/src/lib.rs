// API clients for the sponsorship feed and the GitHub repository API
pub mod feed;
pub mod github;
pub mod retry;

// Re-export common types
pub use feed::{FeedClient, FeedError};
pub use github::{GitHubClient, GitHubError, GitHubOwner, GitHubRepo};
pub use retry::{Retryable, RetryConfig};
