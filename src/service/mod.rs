pub mod aggregation;
pub mod ingestion;
pub mod listing;
pub mod summary;

pub use aggregation::AggregationService;
pub use ingestion::{HttpSeedSource, IngestionReport, IngestionService, SeedSource};
pub use listing::ListingService;
pub use summary::SummaryService;
