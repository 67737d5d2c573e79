use crate::db::RecordStore;
use crate::error::{Aggregation, ServiceError};
use crate::models::{CategoryCount, Month, PriceRangeHistogram, SalesStats};
use std::sync::Arc;

/// 汇总服务: 三个互相独立的只读统计, 均按月份过滤
pub struct AggregationService {
    store: Arc<dyn RecordStore>,
}

impl AggregationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// 销售统计, 无匹配记录时返回 0
    pub async fn sales_stats(&self, month: Month) -> Result<SalesStats, ServiceError> {
        let totals = self
            .store
            .sales_totals(month)
            .await
            .map_err(ServiceError::aggregation(Aggregation::SalesStats))?;
        Ok(SalesStats::from(totals))
    }

    /// 价格区间直方图, 空区间计 0
    pub async fn price_ranges(&self, month: Month) -> Result<PriceRangeHistogram, ServiceError> {
        let counts = self
            .store
            .price_buckets(month)
            .await
            .map_err(ServiceError::aggregation(Aggregation::PriceRanges))?;
        Ok(PriceRangeHistogram::from_counts(counts))
    }

    /// 分类统计, 不补齐未出现的分类
    pub async fn categories(&self, month: Month) -> Result<Vec<CategoryCount>, ServiceError> {
        self.store
            .category_counts(month)
            .await
            .map_err(ServiceError::aggregation(Aggregation::Categories))
    }
}
