use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;
use txn_dashboard::service::HttpSeedSource;
use txn_dashboard::{create_pool, ensure_schema, router, AppConfig, AppState, MemoryStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建存储: 配置了 DATABASE_URL 时使用 PostgreSQL, 否则使用内存存储
    let store: Arc<dyn RecordStore> = match &config.database.url {
        Some(url) => {
            let pool = create_pool(url, &config.database).await?;
            ensure_schema(&pool).await?;
            info!("Database pool created");
            Arc::new(PgRecordStore::new(pool))
        }
        None => {
            warn!("No database url configured, records are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let source = Arc::new(HttpSeedSource::new(&config.ingestion)?);
    let state = AppState::new(store, source, config.listing);
    let app = router(state);

    // 启动服务器
    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /api/products                       - paginated listing");
    info!("  GET /api/products/fetch-and-store       - seed from {}", config.ingestion.source_url);
    info!("  GET /api/products/product-stats         - sales stats");
    info!("  GET /api/products/product-price-ranges  - price histogram");
    info!("  GET /api/products/product-category      - category counts");
    info!("  GET /api/products-summary               - combined summary");
    info!("  GET /                                   - dashboard");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
