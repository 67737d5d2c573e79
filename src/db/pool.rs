use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut connect_options = PgConnectOptions::from_str(database_url)?;

    // 设置慢查询日志阈值为 5秒
    connect_options = connect_options.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        Duration::from_secs(5)
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(connect_options)
        .await
}

/// 建表 (若不存在)
/// row_id 与 created_at 为内部字段, 查询结果不返回
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            row_id       BIGSERIAL PRIMARY KEY,
            id           BIGINT NOT NULL,
            title        TEXT NOT NULL,
            description  TEXT NOT NULL,
            price        DOUBLE PRECISION NOT NULL,
            category     TEXT NOT NULL,
            sold         BOOLEAN NOT NULL,
            date_of_sale TIMESTAMPTZ NOT NULL,
            image        TEXT NOT NULL,
            created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_products_sale_month
        ON products ((EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC')))
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
