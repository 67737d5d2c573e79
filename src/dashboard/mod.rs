//! 交易看板 (服务端渲染 + htmx)
//!
//! - state: 不可变状态与状态转换
//! - view: HTML 渲染
//! - page: 页面路由

pub mod page;
pub mod state;
pub mod view;

pub use state::{Action, DashboardState, Effect, Fetch, ListingKey, Phase, Transition};
