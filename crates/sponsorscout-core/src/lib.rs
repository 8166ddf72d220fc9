// Core business logic lives here - the brain of the operation
pub mod config;
pub mod criteria;
pub mod error;
pub mod export;
pub mod facets;
pub mod feed;
pub mod filter;
pub mod format;
pub mod fuzzy;
pub mod models;
pub mod source;
pub mod topics;

pub use config::Config;
pub use criteria::{FilterCriteria, PlacementFilter};
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use facets::{compute_bounds, Bounds, FacetBounds};
pub use filter::{filter, FilterEngine};
pub use fuzzy::{ApproximateMatcher, FuzzyOptions};
pub use models::{Entry, Listing, Placement, RepositoryMetadata, RepositoryOwner};
pub use source::{DataSource, FeedLocation, GitHubProvider, MetadataProvider};
pub use topics::{suggest, topic_frequency, TopicCount, TopicSuggestion};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
