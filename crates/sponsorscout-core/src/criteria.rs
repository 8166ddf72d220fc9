use serde::{Deserialize, Serialize};

use crate::facets::FacetBounds;

/// Which placements the visitor is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementFilter {
    pub readme: bool,
    pub website: bool,
}

impl Default for PlacementFilter {
    fn default() -> Self {
        Self {
            readme: true,
            website: true,
        }
    }
}

/// Everything the visitor has dialed in
///
/// `Default` is the unbounded criteria: no query, no tags, every placement,
/// stars `0..=u64::MAX` (and a zero `min_stars` switches the star filter off
/// anyway), price up to infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    /// Selected topics, in the order they were picked
    pub tags: Vec<String>,
    pub min_stars: u64,
    pub max_stars: u64,
    pub max_price: f64,
    pub placement: PlacementFilter,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            tags: Vec::new(),
            min_stars: 0,
            max_stars: u64::MAX,
            max_price: f64::INFINITY,
            placement: PlacementFilter::default(),
        }
    }
}

impl FilterCriteria {
    /// Fresh criteria with star and price limits taken from the universe
    ///
    /// An empty universe has sentinel bounds, in which case the unbounded
    /// defaults are kept.
    pub fn seeded(bounds: &FacetBounds) -> Self {
        let mut criteria = Self::default();
        criteria.apply_bounds(bounds);
        criteria
    }

    /// Back to square one: no query, no tags, all placements, full ranges
    pub fn reset(&mut self, bounds: &FacetBounds) {
        *self = Self::seeded(bounds);
    }

    fn apply_bounds(&mut self, bounds: &FacetBounds) {
        if !bounds.stars.is_empty() {
            self.min_stars = bounds.stars.min;
            self.max_stars = bounds.stars.max;
        }
        if !bounds.price.is_empty() {
            self.max_price = bounds.price.max;
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add the tag, or remove it if it's already selected
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.has_tag(tag) {
            self.remove_tag(tag);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Drop the most recently picked tag
    pub fn pop_tag(&mut self) -> Option<String> {
        self.tags.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::Bounds;

    fn bounds() -> FacetBounds {
        FacetBounds {
            stars: Bounds { min: 10, max: 100 },
            price: Bounds { min: 5.0, max: 20.0 },
        }
    }

    #[test]
    fn test_seeded_from_universe_bounds() {
        let criteria = FilterCriteria::seeded(&bounds());
        assert_eq!(criteria.min_stars, 10);
        assert_eq!(criteria.max_stars, 100);
        assert_eq!(criteria.max_price, 20.0);
        assert!(criteria.placement.readme && criteria.placement.website);
    }

    #[test]
    fn test_seeded_from_empty_universe_keeps_defaults() {
        let empty = FacetBounds {
            stars: Bounds::<u64>::EMPTY,
            price: Bounds::<f64>::EMPTY,
        };
        assert_eq!(FilterCriteria::seeded(&empty), FilterCriteria::default());
    }

    #[test]
    fn test_toggle_and_pop_tags() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_tag("rust");
        criteria.toggle_tag("cli");
        assert_eq!(criteria.tags, vec!["rust", "cli"]);

        criteria.toggle_tag("rust");
        assert_eq!(criteria.tags, vec!["cli"]);

        assert_eq!(criteria.pop_tag().as_deref(), Some("cli"));
        assert_eq!(criteria.pop_tag(), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut criteria = FilterCriteria::seeded(&bounds());
        criteria.query = "tokio".into();
        criteria.tags.push("async".into());
        criteria.max_price = 7.0;
        criteria.placement.website = false;

        criteria.reset(&bounds());
        assert_eq!(criteria, FilterCriteria::seeded(&bounds()));
    }
}
