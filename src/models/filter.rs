use super::Product;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 月份过滤条件 (1-12), 只看 dateOfSale 的月份, 忽略年份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    pub const MARCH: Month = Month(3);

    pub const NAMES: [&'static str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];

    pub fn new(value: u32) -> Option<Self> {
        (1..=12).contains(&value).then_some(Self(value))
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[(self.0 - 1) as usize]
    }

    /// 按 UTC 日历月判断
    pub fn contains(self, product: &Product) -> bool {
        product.date_of_sale.month() == self.0
    }
}

impl TryFrom<u32> for Month {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Month::new(value).ok_or_else(|| format!("month must be between 1 and 12, got {}", value))
    }
}

impl From<Month> for u32 {
    fn from(month: Month) -> u32 {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 搜索意图: 纯文本, 或可解析为数字 (额外按价格精确匹配)
#[derive(Debug, Clone, PartialEq)]
pub enum SearchIntent {
    Text(String),
    Numeric { text: String, price: f64 },
}

impl SearchIntent {
    /// 空字符串视为不搜索
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let text = raw.to_string();
        match raw.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => Some(SearchIntent::Numeric { text, price }),
            _ => Some(SearchIntent::Text(text)),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SearchIntent::Text(text) | SearchIntent::Numeric { text, .. } => text,
        }
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            SearchIntent::Text(_) => None,
            SearchIntent::Numeric { price, .. } => Some(*price),
        }
    }

    /// ILIKE 模式, 转义通配符
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text().len() + 2);
        pattern.push('%');
        for c in self.text().chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// 标题或分类包含文本 (忽略大小写), 或价格等于数字
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.text().to_lowercase();
        product.title.to_lowercase().contains(&needle)
            || product.category.to_lowercase().contains(&needle)
            || self.price().is_some_and(|price| product.price == price)
    }
}

/// 列表查询条件 = 月份 AND (可选) 搜索
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub month: Month,
    pub search: Option<SearchIntent>,
}

impl ListingFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.month.contains(product)
            && self.search.as_ref().map_or(true, |search| search.matches(product))
    }
}
