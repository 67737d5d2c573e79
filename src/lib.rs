pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use db::{create_pool, ensure_schema, MemoryStore, PgRecordStore, RecordStore};
pub use error::{ApiError, ServiceError, StoreError};
pub use service::{AggregationService, IngestionService, ListingService, SummaryService};
