use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry, RetryConfig, Retryable};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Authentication failed - check your GitHub token")]
    AuthFailed,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for GitHubError {
    fn is_retryable(&self) -> bool {
        match self {
            GitHubError::ServerError { .. } | GitHubError::RateLimitExceeded => true,
            // Timeouts and dropped connections, not malformed bodies
            GitHubError::NetworkError(e) => !e.is_decode(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Client for the GitHub REST API
///
/// Only the repository lookup is needed here, the token is optional and
/// just raises the rate limit from 60 to 5000 requests per hour.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    retry_config: RetryConfig,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local mock server
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("SponsorScout/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            reqwest::header::HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config: RetryConfig::default(),
        }
    }

    /// Swap in a custom retry configuration
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// URL of a single repository resource
    pub fn repository_url(&self, owner: &str, name: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        )
    }

    /// Get a repository by owner and name
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<GitHubRepo> {
        let url = self.repository_url(owner, name);
        let full_name = format!("{}/{}", owner, name);

        with_retry(&self.retry_config, || async {
            let mut request = self.client.get(&url);

            if let Some(ref token) = self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(GitHubError::NotFound(full_name.clone()));
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(GitHubError::AuthFailed);
            }

            // GitHub answers 403 instead of 429 when the hourly quota runs out
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || (status == reqwest::StatusCode::FORBIDDEN && quota_exhausted(&response))
            {
                return Err(GitHubError::RateLimitExceeded);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();

                if is_retryable_status(status) {
                    return Err(GitHubError::ServerError {
                        status: status.as_u16(),
                        body,
                    });
                }

                return Err(GitHubError::RequestFailed(format!(
                    "Status {}: {}",
                    status, body
                )));
            }

            let repo: GitHubRepo = response.json().await?;
            Ok(repo)
        })
        .await
    }
}

fn quota_exhausted(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Repository payload from `GET /repos/{owner}/{repo}`
///
/// Only the fields the directory shows are mapped, serde skips the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub html_url: String,
    pub owner: GitHubOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_url_encodes_segments() {
        let client = GitHubClient::with_base_url(None, "https://ghe.example.com/api/v3/".into());
        assert_eq!(
            client.repository_url("octo cat", "hello"),
            "https://ghe.example.com/api/v3/repos/octo%20cat/hello"
        );
    }

    #[test]
    fn test_blank_token_is_ignored() {
        assert!(!GitHubClient::new(Some("  ".into())).has_token());
        assert!(GitHubClient::new(Some("ghp_abc".into())).has_token());
    }

    #[test]
    fn test_parse_repository_payload() {
        let json = r#"{
            "id": 42,
            "name": "hello",
            "full_name": "octo/hello",
            "description": null,
            "homepage": "https://hello.dev",
            "stargazers_count": 1234,
            "html_url": "https://github.com/octo/hello",
            "forks_count": 7,
            "owner": { "login": "octo", "avatar_url": "https://avatars.example/octo" }
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "octo/hello");
        assert_eq!(repo.stargazers_count, 1234);
        assert!(repo.topics.is_empty());
        assert_eq!(repo.owner.avatar_url, "https://avatars.example/octo");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(GitHubError::RateLimitExceeded.is_retryable());
        assert!(GitHubError::ServerError { status: 502, body: String::new() }.is_retryable());
        assert!(!GitHubError::NotFound("a/b".into()).is_retryable());
        assert!(!GitHubError::AuthFailed.is_retryable());
    }
}
