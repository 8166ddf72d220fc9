use serde::{Deserialize, Serialize};

use crate::format::compact_number;

/// Where a sponsor's logo ends up
///
/// The feed is a closed vocabulary (`repo`, `website`, `both`). Anything else
/// is kept around as `Other` so the filter can drop it instead of us blowing
/// up while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Placement {
    /// Badge in the repository README (`repo` in the feed)
    Readme,
    Website,
    Both,
    Other(String),
}

impl Placement {
    /// Exact, case-sensitive match on the trimmed value
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            // Older feeds spelled it "readme"
            "repo" | "readme" => Placement::Readme,
            "website" => Placement::Website,
            "both" => Placement::Both,
            _ => Placement::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Placement::Readme => "repo",
            Placement::Website => "website",
            Placement::Both => "both",
            Placement::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Placement::Other(_))
    }

    /// Badges shown on a card
    pub fn badges(&self) -> &'static [&'static str] {
        match self {
            Placement::Readme => &["readme"],
            Placement::Website => &["website"],
            Placement::Both => &["website", "readme"],
            Placement::Other(_) => &[],
        }
    }

    /// Where the logo gets displayed, for the sponsor pitch
    pub fn surface(&self) -> &'static str {
        match self {
            Placement::Both => "both the README and the website",
            Placement::Website => "the website",
            _ => "the README",
        }
    }
}

impl From<String> for Placement {
    fn from(raw: String) -> Self {
        Placement::parse(&raw)
    }
}

impl From<Placement> for String {
    fn from(placement: Placement) -> Self {
        placement.as_str().to_string()
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the sponsorship feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// `owner/name`
    pub repo: String,
    /// Monthly price in dollars, `None` if the feed value was garbage
    pub ad_price: Option<f64>,
    pub placement: Placement,
    pub sponsor_url: String,
}

impl Entry {
    /// Split `owner/name`, `None` when the identifier is malformed
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repo.split_once('/')?;
        let (owner, name) = (owner.trim(), name.trim());

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }

        Some((owner, name))
    }

    /// The footer sentence on a card
    pub fn pitch(&self) -> String {
        let price = self
            .ad_price
            .map(|p| format!("$ {}", compact_number(p)))
            .unwrap_or_else(|| "$ ?".to_string());

        format!(
            "Become a sponsor for as low as {} per month and have your brand logo displayed on {} of the repository.",
            price,
            self.placement.surface()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
    pub avatar_url: String,
}

/// Repository data as returned by GitHub, trimmed to what the directory shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    pub owner: RepositoryOwner,
    pub html_url: String,
}

/// The unit everything filters over: repository plus its sponsorship offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub repository: RepositoryMetadata,
    pub entry: Entry,
}

impl Listing {
    pub fn new(repository: RepositoryMetadata, entry: Entry) -> Self {
        Self { repository, entry }
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.repository.topics.iter().any(|t| t == topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(repo: &str, placement: &str) -> Entry {
        Entry {
            repo: repo.to_string(),
            ad_price: Some(20.0),
            placement: Placement::parse(placement),
            sponsor_url: "https://sponsor.me".to_string(),
        }
    }

    #[test]
    fn test_placement_vocabulary() {
        assert_eq!(Placement::parse("repo"), Placement::Readme);
        assert_eq!(Placement::parse(" website "), Placement::Website);
        assert_eq!(Placement::parse("readme"), Placement::Readme);
        assert_eq!(Placement::parse("both"), Placement::Both);
        assert_eq!(Placement::parse("sidebar"), Placement::Other("sidebar".into()));
        assert!(!Placement::parse("").is_known());

        // Closed vocabulary, spelled exactly
        assert_eq!(Placement::parse("Repo"), Placement::Other("Repo".into()));
        assert_eq!(Placement::parse("WEBSITE"), Placement::Other("WEBSITE".into()));
    }

    #[test]
    fn test_placement_serializes_as_feed_value() {
        let json = serde_json::to_string(&Placement::Readme).unwrap();
        assert_eq!(json, "\"repo\"");

        let back: Placement = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(back, Placement::Both);
    }

    #[test]
    fn test_owner_and_name() {
        assert_eq!(entry("rust-lang/rust", "repo").owner_and_name(), Some(("rust-lang", "rust")));
        assert_eq!(entry("rust-lang", "repo").owner_and_name(), None);
        assert_eq!(entry("/rust", "repo").owner_and_name(), None);
        assert_eq!(entry("a/b/c", "repo").owner_and_name(), None);
    }

    #[test]
    fn test_pitch_mentions_surface() {
        assert!(entry("a/b", "both").pitch().contains("both the README and the website"));
        assert!(entry("a/b", "website").pitch().contains("on the website of"));
        assert!(entry("a/b", "repo").pitch().contains("$ 20 per month"));
    }
}
