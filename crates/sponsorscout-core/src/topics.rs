use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{criteria::FilterCriteria, models::Listing};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// A row in the topic picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSuggestion<'a> {
    pub topic: &'a str,
    pub count: usize,
    /// Already part of the active tag filter
    pub selected: bool,
}

/// Topics across the universe, most frequent first
///
/// Every occurrence counts. Ties keep the order in which topics were first
/// seen, so the output is stable for a given universe.
pub fn topic_frequency<'a, I>(listings: I) -> Vec<TopicCount>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut index: Vec<TopicCount> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for listing in listings {
        for topic in &listing.repository.topics {
            match positions.get(topic.as_str()) {
                Some(&pos) => index[pos].count += 1,
                None => {
                    positions.insert(topic.as_str(), index.len());
                    index.push(TopicCount {
                        topic: topic.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    // sort_by is stable, ties stay in first-seen order
    index.sort_by(|a, b| b.count.cmp(&a.count));
    index
}

/// Filter the index by what's typed in the topic box
///
/// Plain case-sensitive substring match on the trimmed input, so an empty box
/// lists everything.
pub fn suggest<'a>(
    index: &'a [TopicCount],
    search: &str,
    criteria: &FilterCriteria,
) -> Vec<TopicSuggestion<'a>> {
    let needle = search.trim();

    index
        .iter()
        .filter(|tc| tc.topic.contains(needle))
        .map(|tc| TopicSuggestion {
            topic: &tc.topic,
            count: tc.count,
            selected: criteria.has_tag(&tc.topic),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Placement, RepositoryMetadata, RepositoryOwner};

    fn listing(topics: &[&str]) -> Listing {
        Listing::new(
            RepositoryMetadata {
                id: 1,
                name: "x".into(),
                full_name: "o/x".into(),
                description: None,
                homepage: None,
                topics: topics.iter().map(|t| t.to_string()).collect(),
                stargazers_count: 1,
                owner: RepositoryOwner {
                    login: "o".into(),
                    avatar_url: String::new(),
                },
                html_url: String::new(),
            },
            Entry {
                repo: "o/x".into(),
                ad_price: Some(1.0),
                placement: Placement::Both,
                sponsor_url: String::new(),
            },
        )
    }

    #[test]
    fn test_frequency_descending_with_stable_ties() {
        let universe = vec![
            listing(&["cli", "rust"]),
            listing(&["web", "rust"]),
            listing(&["tui"]),
        ];

        let index = topic_frequency(&universe);
        let flat: Vec<(&str, usize)> = index.iter().map(|t| (t.topic.as_str(), t.count)).collect();
        assert_eq!(flat, vec![("rust", 2), ("cli", 1), ("web", 1), ("tui", 1)]);

        let total: usize = index.iter().map(|t| t.count).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_empty_universe() {
        assert!(topic_frequency(&[] as &[Listing]).is_empty());
    }

    #[test]
    fn test_suggest_is_case_sensitive_substring() {
        let universe = vec![listing(&["rust", "Rust-lang", "trust"])];
        let index = topic_frequency(&universe);

        let mut criteria = FilterCriteria::default();
        criteria.toggle_tag("trust");

        let rows = suggest(&index, "  rust ", &criteria);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topic, "rust");
        assert!(!rows[0].selected);
        assert_eq!(rows[1].topic, "trust");
        assert!(rows[1].selected);

        assert_eq!(suggest(&index, "", &criteria).len(), 3);
    }
}
