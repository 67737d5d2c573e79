use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 价格区间数量
pub const BUCKET_COUNT: usize = 10;

/// 价格区间标签, 按边界顺序; 上界包含 (100 属于 "0-100")
pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = [
    "0-100",
    "101-200",
    "201-300",
    "301-400",
    "401-500",
    "501-600",
    "601-700",
    "701-800",
    "801-900",
    "901 and above",
];

/// 销售汇总原始结果 (数据库聚合)
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct SalesTotals {
    pub total_sales_amount: f64,
    pub total_sold_items: i64,
    pub total_not_sold_items: i64,
}

/// 销售统计 (对外格式, 金额保留两位小数)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales_amount: String,
    pub total_sold_items: i64,
    pub total_not_sold_items: i64,
}

impl From<SalesTotals> for SalesStats {
    fn from(totals: SalesTotals) -> Self {
        Self {
            total_sales_amount: format!("{:.2}", totals.total_sales_amount),
            total_sold_items: totals.total_sold_items,
            total_not_sold_items: totals.total_not_sold_items,
        }
    }
}

/// 价格区间直方图, 十个区间始终全部输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceRangeHistogram(IndexMap<String, i64>);

impl PriceRangeHistogram {
    /// 价格所属区间下标
    pub fn bucket_index(price: f64) -> usize {
        let upper = (price / 100.0).ceil() as i64 - 1;
        upper.clamp(0, BUCKET_COUNT as i64 - 1) as usize
    }

    pub fn from_counts(counts: [i64; BUCKET_COUNT]) -> Self {
        Self(
            BUCKET_LABELS
                .iter()
                .zip(counts)
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
        )
    }

    pub fn get(&self, label: &str) -> Option<i64> {
        self.0.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}

/// 分类统计
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: i64,
}

/// 汇总接口返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_stats: SalesStats,
    pub total_sales: PriceRangeHistogram,
    pub categories: Vec<CategoryCount>,
}

/// 汇总接口返回 (partial 模式, 各项独立成功或失败)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledSummary {
    pub product_stats: Option<SalesStats>,
    pub total_sales: Option<PriceRangeHistogram>,
    pub categories: Option<Vec<CategoryCount>>,
    pub errors: Vec<String>,
}
