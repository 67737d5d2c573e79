use super::RecordStore;
use crate::error::StoreError;
use crate::models::{
    CategoryCount, ListingFilter, Month, PriceRangeHistogram, Product, SalesTotals, BUCKET_COUNT,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// 内存存储, 语义与 PgRecordStore 一致 (插入顺序, 月份忽略年份)
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Product>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn count(&self, filter: &ListingFilter) -> Result<i64, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn find(
        &self,
        filter: &ListingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|p| filter.matches(p))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn sales_totals(&self, month: Month) -> Result<SalesTotals, StoreError> {
        let records = self.records.read().await;
        let totals = records
            .iter()
            .filter(|p| month.contains(p))
            .fold(SalesTotals::default(), |mut acc, p| {
                if p.sold {
                    acc.total_sales_amount += p.price;
                    acc.total_sold_items += 1;
                } else {
                    acc.total_not_sold_items += 1;
                }
                acc
            });
        Ok(totals)
    }

    async fn price_buckets(&self, month: Month) -> Result<[i64; BUCKET_COUNT], StoreError> {
        let records = self.records.read().await;
        let mut counts = [0i64; BUCKET_COUNT];
        for p in records.iter().filter(|p| month.contains(p)) {
            counts[PriceRangeHistogram::bucket_index(p.price)] += 1;
        }
        Ok(counts)
    }

    async fn category_counts(&self, month: Month) -> Result<Vec<CategoryCount>, StoreError> {
        let records = self.records.read().await;
        let mut grouped: BTreeMap<&str, i64> = BTreeMap::new();
        for p in records.iter().filter(|p| month.contains(p)) {
            *grouped.entry(p.category.as_str()).or_insert(0) += 1;
        }
        Ok(grouped
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect())
    }

    async fn insert_many(&self, products: &[Product]) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        records.extend_from_slice(products);
        Ok(products.len() as u64)
    }
}
