use crate::config::ListingConfig;
use crate::error::ApiError;
use crate::models::{ListingFilter, ListingRequest, Month, SearchIntent};
use serde::Deserialize;

/// GET /api/products 查询参数 (原始字符串, 宽松解析)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub month: Option<String>,
    pub search: Option<String>,
}

/// 统计接口查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

/// 汇总接口查询参数, partial=true / partial=1 时返回部分结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    pub month: Option<String>,
    pub partial: Option<String>,
}

impl SummaryParams {
    pub fn partial(&self) -> bool {
        self.partial
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
    }
}

/// 读取开头的整数部分 ("3abc" -> 3, "2.5" -> 2), 无数字时返回 None
pub fn lenient_int(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// 缺省 / 非数字 / 0 使用默认月份, 其余必须在 1-12
pub fn resolve_month(raw: Option<&str>, defaults: &ListingConfig) -> Result<Month, ApiError> {
    match lenient_int(raw) {
        None | Some(0) => Ok(defaults.default_month()),
        Some(value) => u32::try_from(value)
            .ok()
            .and_then(Month::new)
            .ok_or_else(|| ApiError::BadRequest(format!("month must be between 1 and 12, got {}", value))),
    }
}

/// 非正数或无法解析时使用默认值
fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    lenient_int(raw)
        .filter(|v| *v > 0)
        .map(|v| v.min(u32::MAX as i64) as u32)
        .unwrap_or(default)
}

impl ListingParams {
    pub fn into_request(self, defaults: &ListingConfig) -> Result<ListingRequest, ApiError> {
        let month = resolve_month(self.month.as_deref(), defaults)?;
        let page = positive_or(self.page.as_deref(), 1);
        let limit = positive_or(self.limit.as_deref(), defaults.default_limit);
        if let Some(max) = defaults.max_limit {
            if limit > max {
                return Err(ApiError::BadRequest(format!("limit must be at most {}, got {}", max, limit)));
            }
        }
        let search = self.search.as_deref().and_then(SearchIntent::parse);

        Ok(ListingRequest {
            page,
            limit,
            filter: ListingFilter { month, search },
        })
    }
}
