use serde::{Deserialize, Serialize};

use crate::models::Listing;

/// Inclusive `[min, max]` range of a facet
///
/// An empty input produces the sentinel `min = MAX, max = 0` which excludes
/// everything. Check [`Bounds::is_empty`] before turning it into slider limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl Bounds<u64> {
    pub const EMPTY: Self = Self { min: u64::MAX, max: 0 };

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn clamp(&self, value: u64) -> u64 {
        if self.is_empty() {
            return value;
        }
        value.clamp(self.min, self.max)
    }

    pub fn marks(&self) -> Option<[f64; 5]> {
        (!self.is_empty()).then(|| marks(self.min as f64, self.max as f64))
    }
}

impl Bounds<f64> {
    pub const EMPTY: Self = Self { min: f64::MAX, max: 0.0 };

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if self.is_empty() {
            return value;
        }
        value.clamp(self.min, self.max)
    }

    pub fn marks(&self) -> Option<[f64; 5]> {
        (!self.is_empty()).then(|| marks(self.min, self.max))
    }
}

/// Slider marks at 0%, 25%, 50%, 75% and 100% of the range
fn marks(min: f64, max: f64) -> [f64; 5] {
    let span = max - min;
    [0.0, 0.25, 0.5, 0.75, 1.0].map(|f| min + f * span)
}

/// Star and price ranges of a listing sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetBounds {
    pub stars: Bounds<u64>,
    pub price: Bounds<f64>,
}

impl FacetBounds {
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// Compute facet bounds in a single pass
///
/// Works on the universe or on any filtered subset (`&[Listing]` or
/// `Vec<&Listing>`). Listings without a usable price don't move the price range.
pub fn compute_bounds<'a, I>(listings: I) -> FacetBounds
where
    I: IntoIterator<Item = &'a Listing>,
{
    listings.into_iter().fold(
        FacetBounds {
            stars: Bounds::<u64>::EMPTY,
            price: Bounds::<f64>::EMPTY,
        },
        |mut acc, listing| {
            let stars = listing.repository.stargazers_count;
            acc.stars.min = acc.stars.min.min(stars);
            acc.stars.max = acc.stars.max.max(stars);

            if let Some(price) = listing.entry.ad_price {
                acc.price.min = acc.price.min.min(price);
                acc.price.max = acc.price.max.max(price);
            }

            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Placement, RepositoryMetadata, RepositoryOwner};

    fn listing(stars: u64, price: Option<f64>) -> Listing {
        Listing::new(
            RepositoryMetadata {
                id: stars,
                name: "x".into(),
                full_name: format!("o/x{}", stars),
                description: None,
                homepage: None,
                topics: vec![],
                stargazers_count: stars,
                owner: RepositoryOwner {
                    login: "o".into(),
                    avatar_url: String::new(),
                },
                html_url: String::new(),
            },
            Entry {
                repo: format!("o/x{}", stars),
                ad_price: price,
                placement: Placement::Readme,
                sponsor_url: String::new(),
            },
        )
    }

    #[test]
    fn test_empty_input_returns_sentinel() {
        let bounds = compute_bounds(&[] as &[Listing]);
        assert_eq!(bounds.stars, Bounds { min: u64::MAX, max: 0 });
        assert_eq!(bounds.price, Bounds { min: f64::MAX, max: 0.0 });
        assert!(bounds.is_empty());
        assert_eq!(bounds.stars.clamp(7), 7);
        assert!(bounds.stars.marks().is_none());
    }

    #[test]
    fn test_bounds_over_slice_and_subset() {
        let universe = vec![listing(10, Some(20.0)), listing(100, Some(5.0)), listing(50, None)];

        let all = compute_bounds(&universe);
        assert_eq!(all.stars, Bounds { min: 10, max: 100 });
        assert_eq!(all.price, Bounds { min: 5.0, max: 20.0 });

        let subset: Vec<&Listing> = universe.iter().skip(1).collect();
        let partial = compute_bounds(subset);
        assert_eq!(partial.stars, Bounds { min: 50, max: 100 });
        assert_eq!(partial.price, Bounds { min: 5.0, max: 5.0 });
    }

    #[test]
    fn test_marks_and_clamp() {
        let stars = Bounds { min: 0u64, max: 100 };
        assert_eq!(stars.marks(), Some([0.0, 25.0, 50.0, 75.0, 100.0]));
        assert_eq!(stars.clamp(150), 100);

        let price = Bounds { min: 10.0_f64, max: 20.0 };
        assert_eq!(price.clamp(1.0), 10.0);
        assert_eq!(price.clamp(25.0), 20.0);
    }
}
