pub mod memory;
pub mod pool;
pub mod queries;

pub use memory::MemoryStore;
pub use pool::{create_pool, ensure_schema};
pub use queries::PgRecordStore;

use crate::error::StoreError;
use crate::models::{CategoryCount, ListingFilter, Month, Product, SalesTotals, BUCKET_COUNT};
use async_trait::async_trait;

/// 交易记录存储
/// 所有查询与聚合都交给存储执行, 记录写入后只读
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 满足条件的记录数
    async fn count(&self, filter: &ListingFilter) -> Result<i64, StoreError>;

    /// 按插入顺序分页查询
    async fn find(
        &self,
        filter: &ListingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError>;

    /// 当月销售额 (sold=true) 及已售/未售数量
    async fn sales_totals(&self, month: Month) -> Result<SalesTotals, StoreError>;

    /// 当月各价格区间记录数, 下标对应 BUCKET_LABELS
    async fn price_buckets(&self, month: Month) -> Result<[i64; BUCKET_COUNT], StoreError>;

    /// 当月各分类记录数, 只包含出现过的分类, 按分类名排序
    async fn category_counts(&self, month: Month) -> Result<Vec<CategoryCount>, StoreError>;

    /// 批量写入, 不去重
    async fn insert_many(&self, products: &[Product]) -> Result<u64, StoreError>;
}
