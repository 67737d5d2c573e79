//! 看板页面
//!
//! Endpoints:
//! - page_dashboard: 完整页面, 内容区先显示加载中
//! - htmx_dashboard_content: 内容片段, 并发执行列表与汇总请求后渲染

use super::state::{Action, DashboardState, Effect};
use super::view;
use crate::api::params::{lenient_int, ListingParams};
use crate::api::AppState;
use crate::config::ListingConfig;
use crate::error::ApiError;
use crate::models::{ListingFilter, ListingRequest, Month, SearchIntent};
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

/// 看板查询参数: 列表参数 + 表单记录的上一次月份/搜索
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub month: Option<String>,
    pub search: Option<String>,
    pub prev_month: Option<String>,
    pub prev_search: Option<String>,
}

/// 由查询参数恢复看板状态 (与 /api/products 相同的默认值与校验)
///
/// 先还原上一次的月份/搜索, 再把本次输入作为动作应用, 页码重置由状态机决定。
/// 缺少 prev_* 时 (分页链接、直接访问) 视为未变化。
fn restore(defaults: &ListingConfig, params: DashboardParams) -> Result<DashboardState, ApiError> {
    let search = params.search.clone().unwrap_or_default();
    let request = ListingParams {
        page: params.page,
        limit: params.limit,
        month: params.month,
        search: params.search,
    }
    .into_request(defaults)?;

    let prev_month = lenient_int(params.prev_month.as_deref())
        .and_then(|value| u32::try_from(value).ok())
        .and_then(Month::new)
        .unwrap_or(request.filter.month);
    let prev_search = params.prev_search.unwrap_or_else(|| search.clone());

    let state = DashboardState::new(prev_month, prev_search, request.page, request.limit)
        .apply(Action::SelectMonth(request.filter.month))
        .state
        .apply(Action::SetSearch(search))
        .state;
    Ok(state)
}

/// 执行一个请求, 结果转成状态机动作
async fn run_effect(app: &AppState, effect: Effect) -> Action {
    match effect {
        Effect::FetchListing(key) => {
            let request = ListingRequest {
                page: key.page,
                limit: key.limit,
                filter: ListingFilter {
                    month: key.month,
                    search: SearchIntent::parse(&key.search),
                },
            };
            let result = app.listing.list(&request).await.map_err(|e| {
                tracing::error!("dashboard listing failed: {}", e);
                e.to_string()
            });
            Action::ListingLoaded(result)
        }
        Effect::FetchSummary(month) => {
            let result = app.summary.summarize(month).await.map_err(|e| {
                tracing::error!("dashboard summary failed: {}", e);
                e.to_string()
            });
            Action::SummaryLoaded(result)
        }
    }
}

/// 看板主页
pub async fn page_dashboard(
    State(app): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Html<String>, ApiError> {
    let state = restore(&app.defaults, params)?.start().state;
    Ok(Html(view::render_shell(&state)))
}

/// HTMX: 看板内容片段
pub async fn htmx_dashboard_content(
    State(app): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Html<String>, ApiError> {
    let transition = restore(&app.defaults, params)?.start();

    let actions = futures::future::join_all(
        transition
            .effects
            .into_iter()
            .map(|effect| run_effect(&app, effect)),
    )
    .await;

    let state = actions
        .into_iter()
        .fold(transition.state, |state, action| state.apply(action).state);
    Ok(Html(view::render_fragment(&state)))
}
