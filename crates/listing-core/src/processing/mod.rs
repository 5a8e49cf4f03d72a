//! Listing data-processing core: feed normalization, duplicate detection,
//! fraud heuristics and market aggregates.
//!
//! Every stage is a pure function over in-memory listings; the only state is
//! the fingerprint map built and discarded inside one deduplication pass.

pub mod dedup;
pub mod enrich;
pub mod fraud;
pub mod input;
pub mod market;
pub mod normalize;
pub mod pipeline;
pub mod property;
pub mod router;

pub use dedup::{detect_duplicates, DuplicatePair, DuplicateReport, Fingerprint};
pub use enrich::{enrich_listing, EnrichedProperty};
pub use fraud::{check_for_fraud, FraudAssessment, FraudConfig, FraudRule, FraudScorer};
pub use input::ListingInputError;
pub use market::{analyze_market_data, MarketStats, PriceRange};
pub use normalize::{normalize_batch, normalize_listing, FeedSource};
pub use pipeline::{
    ListingPipeline, PipelineConfig, PipelineReport, PipelineStatistics, ScoredListing,
    SourceBatch,
};
pub use property::{ContactInfo, Property, PropertyType, RawListing, TransactionKind};
pub use router::listing_router;
