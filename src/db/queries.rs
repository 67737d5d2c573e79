use super::RecordStore;
use crate::error::StoreError;
use crate::models::{CategoryCount, ListingFilter, Month, Product, SalesTotals, BUCKET_COUNT};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

/// 月份条件 (UTC 日历月, 忽略年份)
const MONTH_CONDITION: &str = "EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC') = ";

/// 批量插入每块行数 (8 列, 远低于 65535 参数上限)
const INSERT_CHUNK: usize = 1000;

/// PostgreSQL 存储
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 拼接 WHERE 条件: 月份 AND (标题 ILIKE OR 分类 ILIKE [OR 价格相等])
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    builder.push(" WHERE ");
    builder.push(MONTH_CONDITION);
    builder.push_bind(filter.month.number() as i32);

    if let Some(search) = &filter.search {
        let pattern = search.like_pattern();
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(r" ESCAPE '\' OR category ILIKE ");
        builder.push_bind(pattern);
        builder.push(r" ESCAPE '\'");
        if let Some(price) = search.price() {
            builder.push(" OR price = ");
            builder.push_bind(price);
        }
        builder.push(")");
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn count(&self, filter: &ListingFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find(
        &self,
        filter: &ListingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, title, description, price, category, sold, date_of_sale, image FROM products",
        );
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY row_id OFFSET ");
        builder.push_bind(offset);
        builder.push(" LIMIT ");
        builder.push_bind(limit);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn sales_totals(&self, month: Month) -> Result<SalesTotals, StoreError> {
        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT COALESCE(SUM(price) FILTER (WHERE sold), 0)::float8 AS total_sales_amount,
                   COUNT(*) FILTER (WHERE sold) AS total_sold_items,
                   COUNT(*) FILTER (WHERE NOT sold) AS total_not_sold_items
            FROM products
            WHERE EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC') = $1
            "#
        )
        .bind(month.number() as i32)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn price_buckets(&self, month: Month) -> Result<[i64; BUCKET_COUNT], StoreError> {
        // 区间上界包含: 100 -> 0, 100.5 -> 1, 超过 900 -> 9
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT LEAST(GREATEST(CEIL(price / 100.0)::int - 1, 0), 9) AS bucket,
                   COUNT(*) AS count
            FROM products
            WHERE EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC') = $1
            GROUP BY bucket
            "#
        )
        .bind(month.number() as i32)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = [0i64; BUCKET_COUNT];
        for (bucket, count) in rows {
            let idx = (bucket.max(0) as usize).min(BUCKET_COUNT - 1);
            counts[idx] += count;
        }
        Ok(counts)
    }

    async fn category_counts(&self, month: Month) -> Result<Vec<CategoryCount>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM products
            WHERE EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC') = $1
            GROUP BY category
            ORDER BY category
            "#
        )
        .bind(month.number() as i32)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// 批量插入 (单事务, 每1000条分块)
    async fn insert_many(&self, products: &[Product]) -> Result<u64, StoreError> {
        if products.is_empty() {
            return Ok(0);
        }

        tracing::debug!("开始批量插入, {} 条记录", products.len());
        let start_time = std::time::Instant::now();

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for chunk in products.chunks(INSERT_CHUNK) {
            let mut query_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO products (id, title, description, price, category, sold, date_of_sale, image) "
            );

            query_builder.push_values(chunk, |mut b, product| {
                b.push_bind(product.id)
                    .push_bind(&product.title)
                    .push_bind(&product.description)
                    .push_bind(product.price)
                    .push_bind(&product.category)
                    .push_bind(product.sold)
                    .push_bind(product.date_of_sale)
                    .push_bind(&product.image);
            });

            let result = query_builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!("✓ INSERT执行成功, 影响 {} 行, 耗时: {:?}", inserted, start_time.elapsed());
        Ok(inserted)
    }
}
