use super::params::{resolve_month, ListingParams, MonthParams, SummaryParams};
use super::AppState;
use crate::error::ApiError;
use crate::models::{CategoryCount, ListingPage, PriceRangeHistogram, SalesStats};
use crate::service::IngestionReport;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 分页列表 (月份 + 可选搜索)
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingPage>, ApiError> {
    let request = params.into_request(&state.defaults)?;
    let page = state.listing.list(&request).await?;
    Ok(Json(page))
}

/// 拉取种子数据并写入 (不去重)
pub async fn fetch_and_store(State(state): State<AppState>) -> Result<Json<IngestionReport>, ApiError> {
    let report = state.ingestion.run().await?;
    Ok(Json(report))
}

/// 销售统计
pub async fn product_stats(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<SalesStats>, ApiError> {
    let month = resolve_month(params.month.as_deref(), &state.defaults)?;
    Ok(Json(state.aggregation.sales_stats(month).await?))
}

/// 价格区间直方图
pub async fn product_price_ranges(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<PriceRangeHistogram>, ApiError> {
    let month = resolve_month(params.month.as_deref(), &state.defaults)?;
    Ok(Json(state.aggregation.price_ranges(month).await?))
}

/// 分类统计
pub async fn product_category(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let month = resolve_month(params.month.as_deref(), &state.defaults)?;
    Ok(Json(state.aggregation.categories(month).await?))
}

/// 汇总: 默认任一失败整体 500, partial=true 时返回已成功的部分
pub async fn products_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Response, ApiError> {
    let month = resolve_month(params.month.as_deref(), &state.defaults)?;
    if params.partial() {
        let settled = state.summary.summarize_settled(month).await;
        return Ok(Json(settled).into_response());
    }
    let summary = state.summary.summarize(month).await?;
    Ok(Json(summary).into_response())
}
