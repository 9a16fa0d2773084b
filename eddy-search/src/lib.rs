//! Eddy Search - Multi-provider content aggregation

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Fans queries out to independently failing, independently slow upstream
//! providers and merges whatever comes back. Search is concurrent across all
//! active providers, the hot list walks a fixed preference list
//! sequentially, and detail lookups target exactly one provider.

pub mod detail;
pub mod errors;
pub mod hot;
pub mod probe;
pub mod providers;
pub mod query;
pub mod search;
pub mod service;
pub mod types;

// Re-export main types
pub use detail::DetailFetcher;
pub use errors::{AggregationError, UpstreamError};
pub use hot::HotListAggregator;
pub use probe::LatencyProbe;
pub use providers::{HttpUpstreamClient, UpstreamClient};
pub use query::ProviderQuery;
pub use search::{Contribution, SearchAggregator};
pub use service::AggregationService;
pub use types::{ContentItem, LatencyResult, SENTINEL_LATENCY_MS, extract_list};

/// Convenience type alias for Results with AggregationError.
pub type Result<T> = std::result::Result<T, AggregationError>;
