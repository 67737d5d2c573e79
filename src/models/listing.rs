use super::{ListingFilter, Product};
use serde::{Deserialize, Serialize};

/// 列表查询请求 (已校验)
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub page: u32,
    pub limit: u32,
    pub filter: ListingFilter,
}

impl ListingRequest {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// 列表分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
    pub products: Vec<Product>,
}

/// 总页数 = ceil(total / limit)
pub fn total_pages(total: i64, limit: u32) -> i64 {
    let limit = limit.max(1) as i64;
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(60, 7), 9);
    }
}
