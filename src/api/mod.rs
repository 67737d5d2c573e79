pub mod handlers;
pub mod params;

use crate::config::ListingConfig;
use crate::dashboard;
use crate::db::RecordStore;
use crate::service::{AggregationService, IngestionService, ListingService, SeedSource, SummaryService};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 共享状态: 所有服务共用同一个存储
#[derive(Clone)]
pub struct AppState {
    pub listing: Arc<ListingService>,
    pub aggregation: Arc<AggregationService>,
    pub summary: Arc<SummaryService>,
    pub ingestion: Arc<IngestionService>,
    pub defaults: ListingConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn SeedSource>, defaults: ListingConfig) -> Self {
        let aggregation = Arc::new(AggregationService::new(store.clone()));
        Self {
            listing: Arc::new(ListingService::new(store.clone())),
            summary: Arc::new(SummaryService::new(aggregation.clone())),
            aggregation,
            ingestion: Arc::new(IngestionService::new(store, source)),
            defaults,
        }
    }
}

/// 构建路由: JSON 接口 + 看板页面
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/fetch-and-store", get(handlers::fetch_and_store))
        .route("/api/products/product-stats", get(handlers::product_stats))
        .route("/api/products/product-price-ranges", get(handlers::product_price_ranges))
        .route("/api/products/product-category", get(handlers::product_category))
        .route("/api/products-summary", get(handlers::products_summary))
        .route("/", get(dashboard::page::page_dashboard))
        .route("/dashboard/content", get(dashboard::page::htmx_dashboard_content))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
