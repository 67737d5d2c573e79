use crate::config::IngestionConfig;
use crate::db::RecordStore;
use crate::error::ServiceError;
use crate::models::Product;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// 种子数据来源
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Product>, ServiceError>;
}

/// 从固定 URL 拉取 JSON 数组
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(config: &IngestionConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<Vec<Product>, ServiceError> {
        tracing::info!("Fetching seed data from {}", self.url);
        let products = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Product>>()
            .await?;
        Ok(products)
    }
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionReport {
    pub message: String,
    pub fetched: usize,
    pub inserted: u64,
}

/// 导入服务: 一次性拉取并批量写入, 不去重 (重复调用会产生重复记录)
pub struct IngestionService {
    store: Arc<dyn RecordStore>,
    source: Arc<dyn SeedSource>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn SeedSource>) -> Self {
        Self { store, source }
    }

    pub async fn run(&self) -> Result<IngestionReport, ServiceError> {
        let products = self.source.fetch().await?;
        let fetched = products.len();

        let inserted = self
            .store
            .insert_many(&products)
            .await
            .map_err(ServiceError::SeedStore)?;
        tracing::info!("Seeded {} of {} fetched records", inserted, fetched);

        Ok(IngestionReport {
            message: "Data successfully fetched and stored!".to_string(),
            fetched,
            inserted,
        })
    }
}
