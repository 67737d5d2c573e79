//! 看板状态机
//!
//! 状态不可变: 用户操作与请求结果都经过 `DashboardState::apply`,
//! 返回新状态及需要发起的请求。搜索变化重置页码、加载标记等派生值只在这里计算。

use crate::models::{ListingPage, Month, ProductSummary};

/// 远程数据槽
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// 列表请求参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingKey {
    pub month: Month,
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

impl ListingKey {
    /// `/api/products` 与 `/dashboard/content` 通用的查询串
    pub fn query_string(&self) -> String {
        let mut query = format!("month={}&page={}&limit={}", self.month, self.page, self.limit);
        if !self.search.is_empty() {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(&self.search));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectMonth(Month),
    SetSearch(String),
    GoToPage(u32),
    ListingLoaded(Result<ListingPage, String>),
    SummaryLoaded(Result<ProductSummary, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchListing(ListingKey),
    FetchSummary(Month),
}

/// 视图应展示的内容
#[derive(Debug, PartialEq)]
pub enum Phase<'a> {
    Loading,
    Failed(&'a str),
    Ready {
        listing: &'a ListingPage,
        summary: &'a ProductSummary,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    month: Month,
    search: String,
    page: u32,
    limit: u32,
    listing: Fetch<ListingPage>,
    summary: Fetch<ProductSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DashboardState,
    pub effects: Vec<Effect>,
}

impl DashboardState {
    pub fn new(month: Month, search: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            month,
            search: search.into(),
            page: page.max(1),
            limit: limit.max(1),
            listing: Fetch::Idle,
            summary: Fetch::Idle,
        }
    }

    /// 两个数据槽置为加载中, 并发起两个请求
    pub fn start(&self) -> Transition {
        let state = Self {
            listing: Fetch::Loading,
            summary: Fetch::Loading,
            ..self.clone()
        };
        let effects = vec![
            Effect::FetchListing(state.listing_key()),
            Effect::FetchSummary(state.month),
        ];
        Transition { state, effects }
    }

    pub fn apply(&self, action: Action) -> Transition {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match action {
            Action::SelectMonth(month) if month != self.month => {
                next.month = month;
                next.page = 1;
                next.listing = Fetch::Loading;
                next.summary = Fetch::Loading;
                effects.push(Effect::FetchListing(next.listing_key()));
                effects.push(Effect::FetchSummary(month));
            }
            Action::SetSearch(search) if search != self.search => {
                next.search = search;
                next.page = 1;
                next.listing = Fetch::Loading;
                effects.push(Effect::FetchListing(next.listing_key()));
            }
            Action::GoToPage(page) => {
                let page = page.clamp(1, self.last_page().unwrap_or(u32::MAX));
                if page != self.page {
                    next.page = page;
                    next.listing = Fetch::Loading;
                    effects.push(Effect::FetchListing(next.listing_key()));
                }
            }
            // 过期请求由前端 hx-sync 取消, 这里只会收到当前请求的结果
            Action::ListingLoaded(result) => {
                next.listing = match result {
                    Ok(page) => Fetch::Ready(page),
                    Err(message) => Fetch::Failed(message),
                };
            }
            Action::SummaryLoaded(result) => {
                next.summary = match result {
                    Ok(summary) => Fetch::Ready(summary),
                    Err(message) => Fetch::Failed(message),
                };
            }
            _ => {}
        }

        Transition { state: next, effects }
    }

    pub fn listing_key(&self) -> ListingKey {
        ListingKey {
            month: self.month,
            search: self.search.clone(),
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// 列表加载完成后才可知
    pub fn last_page(&self) -> Option<u32> {
        match &self.listing {
            Fetch::Ready(listing) => Some(listing.total_pages.clamp(1, u32::MAX as i64) as u32),
            _ => None,
        }
    }

    /// 加载中优先于失败, 失败优先于数据, 不混合展示
    pub fn phase(&self) -> Phase<'_> {
        match (&self.listing, &self.summary) {
            (Fetch::Idle | Fetch::Loading, _) | (_, Fetch::Idle | Fetch::Loading) => Phase::Loading,
            (Fetch::Failed(message), _) | (_, Fetch::Failed(message)) => Phase::Failed(message),
            (Fetch::Ready(listing), Fetch::Ready(summary)) => Phase::Ready { listing, summary },
        }
    }
}
