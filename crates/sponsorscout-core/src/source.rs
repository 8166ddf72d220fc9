// Data source: feed in, enriched listings out
use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sponsorscout_api::{FeedClient, GitHubClient, GitHubRepo, RetryConfig};
use tracing::{debug, info, warn};

use crate::{
    feed::parse_feed,
    models::{Entry, Listing, RepositoryMetadata, RepositoryOwner},
    Result,
};

/// Where repository metadata comes from
///
/// GitHub in production, a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryMetadata>;
}

/// Wrapper around GitHubClient that implements MetadataProvider
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataProvider for GitHubProvider {
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryMetadata> {
        let repo = self.client.get_repository(owner, name).await?;
        Ok(github_to_metadata(repo))
    }
}

/// Convert the GitHub API payload to our internal model
fn github_to_metadata(gh: GitHubRepo) -> RepositoryMetadata {
    RepositoryMetadata {
        id: gh.id,
        name: gh.name,
        full_name: gh.full_name,
        description: gh.description,
        // GitHub sends "" for a cleared homepage
        homepage: gh.homepage.filter(|h| !h.trim().is_empty()),
        topics: gh.topics,
        stargazers_count: gh.stargazers_count,
        owner: RepositoryOwner {
            login: gh.owner.login,
            avatar_url: gh.owner.avatar_url,
        },
        html_url: gh.html_url,
    }
}

/// Feed location: a URL or a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Remote(String),
    Local(PathBuf),
}

impl From<&str> for FeedLocation {
    fn from(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            FeedLocation::Remote(raw.to_string())
        } else {
            FeedLocation::Local(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedLocation::Remote(url) => write!(f, "{}", url),
            FeedLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Builds the universe: reads the feed, then asks the provider about every entry
pub struct DataSource {
    provider: Box<dyn MetadataProvider>,
    feed_client: FeedClient,
    concurrency: usize,
}

impl DataSource {
    pub fn new(provider: Box<dyn MetadataProvider>, retry_config: RetryConfig) -> Self {
        Self {
            provider,
            feed_client: FeedClient::new(retry_config),
            concurrency: 8,
        }
    }

    /// How many repository lookups may be in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch the raw feed text
    pub async fn read_feed(&self, location: &FeedLocation) -> Result<String> {
        match location {
            FeedLocation::Remote(url) => Ok(self.feed_client.fetch(url).await?),
            FeedLocation::Local(path) => {
                debug!("Reading sponsorship feed from {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
        }
    }

    /// Load the whole universe from a feed location
    pub async fn load(&self, location: &FeedLocation) -> Result<Vec<Listing>> {
        let text = self.read_feed(location).await?;
        let entries = parse_feed(&text)?;
        info!("Loaded {} entries from {}", entries.len(), location);

        Ok(self.enrich(entries).await)
    }

    /// Pair every entry with its repository metadata, keeping feed order
    ///
    /// Entries with a malformed `owner/name` or a failed lookup are logged and
    /// left out - one deleted repo shouldn't take the whole directory down.
    pub async fn enrich(&self, entries: Vec<Entry>) -> Vec<Listing> {
        let total = entries.len();

        let listings: Vec<Listing> = stream::iter(entries)
            .map(|entry| async move {
                let Some((owner, name)) = entry.owner_and_name() else {
                    warn!("Skipping '{}': not an owner/name identifier", entry.repo);
                    return None;
                };

                match self.provider.get_repository(owner, name).await {
                    Ok(repository) => Some(Listing::new(repository, entry)),
                    Err(e) => {
                        warn!("Skipping '{}': {}", entry.repo, e);
                        None
                    }
                }
            })
            .buffered(self.concurrency)
            .filter_map(|listing| async move { listing })
            .collect()
            .await;

        if listings.len() < total {
            warn!("{} of {} entries could not be loaded", total - listings.len(), total);
        }
        info!("Universe ready with {} listings", listings.len());

        listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Placement, Error};
    use std::io::Write;

    fn metadata(owner: &str, name: &str) -> RepositoryMetadata {
        RepositoryMetadata {
            id: 1,
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            description: None,
            homepage: None,
            topics: vec!["rust".to_string()],
            stargazers_count: 42,
            owner: RepositoryOwner {
                login: owner.to_string(),
                avatar_url: String::new(),
            },
            html_url: format!("https://github.com/{}/{}", owner, name),
        }
    }

    fn source(mock: MockMetadataProvider) -> DataSource {
        DataSource::new(Box::new(mock), RetryConfig::none()).with_concurrency(2)
    }

    #[test]
    fn test_feed_location_detection() {
        assert_eq!(
            FeedLocation::from("https://example.com/feed.csv"),
            FeedLocation::Remote("https://example.com/feed.csv".into())
        );
        assert_eq!(
            FeedLocation::from("./feed.csv"),
            FeedLocation::Local(PathBuf::from("./feed.csv"))
        );
    }

    #[test]
    fn test_blank_homepage_becomes_none() {
        let gh: GitHubRepo = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "hello",
            "full_name": "octo/hello",
            "description": "hi",
            "homepage": "",
            "topics": ["cli"],
            "stargazers_count": 3,
            "html_url": "https://github.com/octo/hello",
            "owner": { "login": "octo", "avatar_url": "https://a/octo" }
        }))
        .unwrap();

        let meta = github_to_metadata(gh);
        assert_eq!(meta.homepage, None);
        assert_eq!(meta.topics, vec!["cli"]);
        assert_eq!(meta.owner.login, "octo");
    }

    #[tokio::test]
    async fn test_enrich_keeps_feed_order_and_skips_failures() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_get_repository()
            .withf(|owner, name| owner.to_string() == "octo" && name.to_string() == "gone")
            .returning(|owner, name| Err(Error::NotFound(format!("{}/{}", owner, name))));
        mock.expect_get_repository()
            .returning(|owner, name| Ok(metadata(owner, name)));

        let entries = ["octo/first", "octo/gone", "not-a-repo", "octo/last"]
            .iter()
            .map(|repo| Entry {
                repo: repo.to_string(),
                ad_price: Some(10.0),
                placement: Placement::Both,
                sponsor_url: "https://sponsor.me".into(),
            })
            .collect();

        let listings = source(mock).enrich(entries).await;
        let names: Vec<&str> = listings.iter().map(|l| l.repository.full_name.as_str()).collect();
        assert_eq!(names, vec!["octo/first", "octo/last"]);
        assert_eq!(listings[0].entry.repo, "octo/first");
    }

    #[tokio::test]
    async fn test_load_from_local_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "repo,ad_price,placement,sponsor_url").unwrap();
        writeln!(file, "octo/hello, 25, website, https://sponsor.me/hello").unwrap();

        let mut mock = MockMetadataProvider::new();
        mock.expect_get_repository()
            .times(1)
            .returning(|owner, name| Ok(metadata(owner, name)));

        let location = FeedLocation::Local(file.path().to_path_buf());
        let universe = source(mock).load(&location).await.unwrap();

        assert_eq!(universe.len(), 1);
        assert_eq!(universe[0].entry.placement, Placement::Website);
        assert_eq!(universe[0].entry.ad_price, Some(25.0));
    }

    #[tokio::test]
    async fn test_missing_local_feed_is_an_error() {
        let mock = MockMetadataProvider::new();
        let location = FeedLocation::Local(PathBuf::from("/definitely/not/here.csv"));

        let err = source(mock).load(&location).await.unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
