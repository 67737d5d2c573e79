use super::AggregationService;
use crate::error::ServiceError;
use crate::models::{Month, ProductSummary, SettledSummary};
use std::sync::Arc;

/// 汇总聚合: 并发发起三个统计, 全部完成后合并
pub struct SummaryService {
    aggregation: Arc<AggregationService>,
}

impl SummaryService {
    pub fn new(aggregation: Arc<AggregationService>) -> Self {
        Self { aggregation }
    }

    /// 任一统计失败则整体失败 (不返回部分结果)
    pub async fn summarize(&self, month: Month) -> Result<ProductSummary, ServiceError> {
        let (product_stats, total_sales, categories) = futures::try_join!(
            self.aggregation.sales_stats(month),
            self.aggregation.price_ranges(month),
            self.aggregation.categories(month),
        )?;

        Ok(ProductSummary {
            product_stats,
            total_sales,
            categories,
        })
    }

    /// 等待全部统计结束, 失败项置空并记录错误信息
    pub async fn summarize_settled(&self, month: Month) -> SettledSummary {
        let (product_stats, total_sales, categories) = futures::join!(
            self.aggregation.sales_stats(month),
            self.aggregation.price_ranges(month),
            self.aggregation.categories(month),
        );

        let mut errors = Vec::new();
        let mut settle = |err: ServiceError| {
            tracing::warn!("partial summary for month {}: {}", month, err);
            errors.push(err.to_string());
        };
        let product_stats = product_stats.map_err(&mut settle).ok();
        let total_sales = total_sales.map_err(&mut settle).ok();
        let categories = categories.map_err(&mut settle).ok();

        SettledSummary {
            product_stats,
            total_sales,
            categories,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RecordStore};
    use crate::error::StoreError;
    use crate::models::{CategoryCount, ListingFilter, Product, SalesTotals, BUCKET_COUNT};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    /// 价格区间查询固定失败, 其余委托给内存存储
    struct BrokenPriceRanges(MemoryStore);

    #[async_trait]
    impl RecordStore for BrokenPriceRanges {
        async fn count(&self, filter: &ListingFilter) -> Result<i64, StoreError> {
            self.0.count(filter).await
        }
        async fn find(&self, filter: &ListingFilter, offset: i64, limit: i64) -> Result<Vec<Product>, StoreError> {
            self.0.find(filter, offset, limit).await
        }
        async fn sales_totals(&self, month: Month) -> Result<SalesTotals, StoreError> {
            self.0.sales_totals(month).await
        }
        async fn price_buckets(&self, _month: Month) -> Result<[i64; BUCKET_COUNT], StoreError> {
            Err(StoreError::Unavailable("bucket stage failed".to_string()))
        }
        async fn category_counts(&self, month: Month) -> Result<Vec<CategoryCount>, StoreError> {
            self.0.category_counts(month).await
        }
        async fn insert_many(&self, products: &[Product]) -> Result<u64, StoreError> {
            self.0.insert_many(products).await
        }
    }

    fn records() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                title: "Backpack".to_string(),
                description: String::new(),
                price: 50.0,
                category: "A".to_string(),
                sold: true,
                date_of_sale: Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
                image: String::new(),
            },
            Product {
                id: 2,
                title: "Jacket".to_string(),
                description: String::new(),
                price: 150.0,
                category: "B".to_string(),
                sold: false,
                date_of_sale: Utc.with_ymd_and_hms(2021, 3, 5, 0, 0, 0).unwrap(),
                image: String::new(),
            },
        ]
    }

    #[tokio::test]
    async fn combines_all_three_summaries() {
        let store = Arc::new(MemoryStore::with_records(records()));
        let service = SummaryService::new(Arc::new(AggregationService::new(store)));

        let summary = service.summarize(Month::new(3).unwrap()).await.unwrap();
        assert_eq!(summary.product_stats.total_sales_amount, "50.00");
        assert_eq!(summary.total_sales.total(), 2);
        assert_eq!(summary.categories.len(), 2);
    }

    #[tokio::test]
    async fn one_failed_summary_fails_the_whole_call() {
        let store = Arc::new(BrokenPriceRanges(MemoryStore::with_records(records())));
        let service = SummaryService::new(Arc::new(AggregationService::new(store)));

        let err = service.summarize(Month::new(3).unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("product price ranges"));
    }

    #[tokio::test]
    async fn settled_mode_keeps_the_successful_parts() {
        let store = Arc::new(BrokenPriceRanges(MemoryStore::with_records(records())));
        let service = SummaryService::new(Arc::new(AggregationService::new(store)));

        let settled = service.summarize_settled(Month::new(3).unwrap()).await;
        assert!(settled.product_stats.is_some());
        assert!(settled.categories.is_some());
        assert!(settled.total_sales.is_none());
        assert_eq!(settled.errors.len(), 1);
    }
}
