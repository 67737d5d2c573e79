//! PgRecordStore 集成测试, 需要 PostgreSQL:
//!
//! DATABASE_URL=postgres://... cargo test --test pg_store -- --ignored
//!
//! 每个测试会清空 products 表, 请勿指向正式库。

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::OnceLock;
use txn_dashboard::config::AppConfig;
use txn_dashboard::models::{CategoryCount, ListingFilter, Month, Product, SearchIntent};
use txn_dashboard::{create_pool, ensure_schema, MemoryStore, PgRecordStore, RecordStore};

/// 测试共用一张表, 串行执行
fn table_lock() -> &'static tokio::sync::Mutex<()> {
    static LOCK: OnceLock<tokio::sync::Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| tokio::sync::Mutex::new(()))
}

async fn fresh_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for pg_store tests");
    let pool = create_pool(&url, &AppConfig::default().database).await.unwrap();
    ensure_schema(&pool).await.unwrap();
    sqlx::query("TRUNCATE products RESTART IDENTITY").execute(&pool).await.unwrap();
    pool
}

fn record(id: i64, title: &str, price: f64, sold: bool, category: &str, month: u32) -> Product {
    Product {
        id,
        title: title.to_string(),
        description: "seed".to_string(),
        price,
        category: category.to_string(),
        sold,
        date_of_sale: Utc.with_ymd_and_hms(2021, month, 15, 8, 30, 0).unwrap(),
        image: format!("https://example.com/{}.jpg", id),
    }
}

fn march() -> Month {
    Month::new(3).unwrap()
}

fn filter(month: Month, search: &str) -> ListingFilter {
    ListingFilter {
        month,
        search: SearchIntent::parse(search),
    }
}

async fn seeded(records: &[Product]) -> (PgRecordStore, MemoryStore) {
    let store = PgRecordStore::new(fresh_pool().await);
    assert_eq!(store.insert_many(records).await.unwrap(), records.len() as u64);
    (store, MemoryStore::with_records(records.to_vec()))
}

#[tokio::test]
#[ignore]
async fn march_scenario_matches_memory_store() {
    let _guard = table_lock().lock().await;
    let records = vec![
        record(1, "Product 1", 50.0, true, "A", 3),
        record(2, "Product 2", 150.0, false, "B", 3),
        record(3, "Product 3", 999.0, true, "A", 4),
    ];
    let (pg, memory) = seeded(&records).await;

    let totals = pg.sales_totals(march()).await.unwrap();
    assert_eq!(totals.total_sales_amount, 50.0);
    assert_eq!(totals.total_sold_items, 1);
    assert_eq!(totals.total_not_sold_items, 1);
    assert_eq!(totals, memory.sales_totals(march()).await.unwrap());

    let buckets = pg.price_buckets(march()).await.unwrap();
    assert_eq!(buckets, [1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(buckets, memory.price_buckets(march()).await.unwrap());

    let categories = pg.category_counts(march()).await.unwrap();
    assert_eq!(
        categories,
        vec![
            CategoryCount { category: "A".to_string(), count: 1 },
            CategoryCount { category: "B".to_string(), count: 1 },
        ]
    );
    assert_eq!(categories, memory.category_counts(march()).await.unwrap());

    let all = filter(march(), "");
    assert_eq!(pg.count(&all).await.unwrap(), 2);
    assert_eq!(pg.find(&all, 0, 10).await.unwrap(), memory.find(&all, 0, 10).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn boundary_prices_land_in_upper_inclusive_buckets() {
    let _guard = table_lock().lock().await;
    let records: Vec<Product> = [0.0, 100.0, 100.5, 900.0, 901.0, 25000.0]
        .iter()
        .enumerate()
        .map(|(i, price)| record(i as i64 + 1, "Edge", *price, false, "edge", 3))
        .collect();
    let (pg, memory) = seeded(&records).await;

    let buckets = pg.price_buckets(march()).await.unwrap();
    assert_eq!(buckets, [2, 1, 0, 0, 0, 0, 0, 0, 1, 2]);
    assert_eq!(buckets, memory.price_buckets(march()).await.unwrap());
    assert!(pg.price_buckets(Month::new(4).unwrap()).await.unwrap().iter().all(|c| *c == 0));
}

#[tokio::test]
#[ignore]
async fn sales_totals_only_sum_sold_records_in_month() {
    let _guard = table_lock().lock().await;
    let records = vec![
        record(1, "Sold", 10.25, true, "x", 3),
        record(2, "Sold too", 20.5, true, "x", 3),
        record(3, "Unsold", 1000.0, false, "x", 3),
        record(4, "Other month", 500.0, true, "x", 5),
    ];
    let (pg, memory) = seeded(&records).await;

    let totals = pg.sales_totals(march()).await.unwrap();
    assert_eq!(totals.total_sales_amount, 30.75);
    assert_eq!(totals.total_sold_items, 2);
    assert_eq!(totals.total_not_sold_items, 1);
    assert_eq!(totals, memory.sales_totals(march()).await.unwrap());

    let empty = pg.sales_totals(Month::new(1).unwrap()).await.unwrap();
    assert_eq!(empty.total_sales_amount, 0.0);
    assert_eq!(empty.total_sold_items, 0);
    assert_eq!(empty.total_not_sold_items, 0);
}

#[tokio::test]
#[ignore]
async fn search_treats_wildcards_literally() {
    let _guard = table_lock().lock().await;
    let records = vec![
        record(1, "50% off", 10.0, false, "sale", 3),
        record(2, "500 off", 10.0, false, "sale", 3),
        record(3, "a_b", 10.0, false, "misc", 3),
        record(4, "axb", 10.0, false, "misc", 3),
        record(5, "Lamp", 150.0, false, "home", 3),
    ];
    let (pg, memory) = seeded(&records).await;

    for (search, expected) in [("50%", vec![1]), ("a_b", vec![3]), ("SALE", vec![1, 2]), ("150", vec![5])] {
        let f = filter(march(), search);
        let ids: Vec<i64> = pg.find(&f, 0, 10).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, expected, "search {:?}", search);
        assert_eq!(pg.count(&f).await.unwrap(), expected.len() as i64);
        assert_eq!(pg.find(&f, 0, 10).await.unwrap(), memory.find(&f, 0, 10).await.unwrap());
    }
}

#[tokio::test]
#[ignore]
async fn find_pages_in_insertion_order() {
    let _guard = table_lock().lock().await;
    let records: Vec<Product> = (1..=5)
        .rev()
        .map(|id| record(id, &format!("Item {}", id), 1.0, false, "misc", 3))
        .collect();
    let (pg, memory) = seeded(&records).await;

    let all = filter(march(), "");
    let ids: Vec<i64> = pg.find(&all, 1, 2).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![4, 3]);
    assert_eq!(pg.find(&all, 1, 2).await.unwrap(), memory.find(&all, 1, 2).await.unwrap());
    assert!(pg.find(&all, 10, 2).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn bulk_insert_spans_chunks() {
    let _guard = table_lock().lock().await;
    let records: Vec<Product> = (1..=2500).map(|id| record(id, "Bulk", 1.0, id % 2 == 0, "bulk", 3)).collect();
    let (pg, _) = seeded(&records).await;

    assert_eq!(pg.count(&filter(march(), "")).await.unwrap(), 2500);
    let totals = pg.sales_totals(march()).await.unwrap();
    assert_eq!(totals.total_sold_items, 1250);
    assert_eq!(totals.total_not_sold_items, 1250);
}
