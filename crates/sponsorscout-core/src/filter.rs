// The filter/search pipeline
//
// Five stages, always in this order, each one narrowing what the previous
// stage let through:
//
//   text -> placement -> tags -> price -> stars
//
// The text stage is the only one that can reorder (by relevance). Everything
// is a pure function of the universe and the criteria, cheap enough to rerun
// on every keystroke.
use std::cmp::Ordering;

use tracing::trace;

use crate::{
    criteria::{FilterCriteria, PlacementFilter},
    fuzzy::{field_norm, ApproximateMatcher, FuzzyOptions},
    models::{Listing, Placement},
};

/// Runs [`FilterCriteria`] against a universe of listings
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    matcher: ApproximateMatcher,
}

impl FilterEngine {
    pub fn new(options: FuzzyOptions) -> Self {
        Self {
            matcher: ApproximateMatcher::new(options),
        }
    }

    /// Filtered view of the universe
    pub fn filter<'a>(&self, universe: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
        self.filter_indices(universe, criteria)
            .into_iter()
            .map(|i| &universe[i])
            .collect()
    }

    /// Same as [`FilterEngine::filter`] but as positions in the universe
    ///
    /// Handy for UIs that keep the universe and the results side by side.
    pub fn filter_indices(&self, universe: &[Listing], criteria: &FilterCriteria) -> Vec<usize> {
        let mut hits = self.text_stage(universe, &criteria.query);

        hits.retain(|&i| placement_matches(&universe[i].entry.placement, &criteria.placement));

        if !criteria.tags.is_empty() {
            hits.retain(|&i| criteria.tags.iter().any(|tag| universe[i].has_topic(tag)));
        }

        hits.retain(|&i| {
            universe[i]
                .entry
                .ad_price
                .is_some_and(|price| price <= criteria.max_price)
        });

        // A zero minimum switches the star filter off, zero stars included
        if criteria.min_stars != 0 {
            hits.retain(|&i| {
                let stars = universe[i].repository.stargazers_count;
                criteria.min_stars <= stars && stars <= criteria.max_stars
            });
        }

        trace!(
            "Filter kept {} of {} listings",
            hits.len(),
            universe.len()
        );
        hits
    }

    /// Stage 1: fuzzy search, or everything in universe order for an empty query
    fn text_stage(&self, universe: &[Listing], query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..universe.len()).collect();
        }

        let mut scored: Vec<(usize, f64)> = universe
            .iter()
            .enumerate()
            .filter_map(|(i, listing)| self.relevance(listing, query).map(|score| (i, score)))
            .collect();

        // Lower is better; stable sort keeps universe order among equals
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(i, _)| i).collect()
    }

    /// Combined score over name, topics and description, `None` if nothing matched
    ///
    /// Each matching field multiplies in `score ^ norm`, so a hit in several
    /// fields ranks higher than a hit in one, and a perfect hit counts as
    /// almost (not exactly) zero to keep those comparable too.
    pub fn relevance(&self, listing: &Listing, query: &str) -> Option<f64> {
        let repo = &listing.repository;
        let fields = std::iter::once(repo.full_name.as_str())
            .chain(repo.topics.iter().map(String::as_str))
            .chain(repo.description.as_deref());

        let mut total: Option<f64> = None;
        for field in fields {
            if let Some(score) = self.matcher.score(query, field) {
                let score = if score == 0.0 { f64::EPSILON } else { score };
                *total.get_or_insert(1.0) *= score.powf(field_norm(field));
            }
        }

        total
    }
}

/// Stage 2: closed vocabulary, unknown placements never pass
fn placement_matches(placement: &Placement, wanted: &PlacementFilter) -> bool {
    match placement {
        Placement::Both => wanted.readme || wanted.website,
        Placement::Readme => wanted.readme,
        Placement::Website => wanted.website,
        Placement::Other(_) => false,
    }
}

/// Filter with the default fuzzy options
pub fn filter<'a>(universe: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    FilterEngine::default().filter(universe, criteria)
}
