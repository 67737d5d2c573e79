use crate::db::RecordStore;
use crate::error::ServiceError;
use crate::models::{total_pages, ListingPage, ListingRequest};
use std::sync::Arc;

/// 列表服务: 按月份 (及搜索) 分页查询
pub struct ListingService {
    store: Arc<dyn RecordStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// 计数与分页查询并发执行, 任一失败则整体失败
    pub async fn list(&self, request: &ListingRequest) -> Result<ListingPage, ServiceError> {
        let filter = &request.filter;
        let (total, products) = futures::try_join!(
            self.store.count(filter),
            self.store.find(filter, request.offset(), request.limit as i64),
        )
        .map_err(ServiceError::Listing)?;

        tracing::debug!(
            "listing month={} page={} limit={}: {} of {}",
            filter.month, request.page, request.limit, products.len(), total
        );

        Ok(ListingPage {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(total, request.limit),
            products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{ListingFilter, Month, Product, SearchIntent};
    use chrono::{TimeZone, Utc};

    fn store() -> Arc<dyn RecordStore> {
        let records = (1..=23)
            .map(|id| Product {
                id,
                title: if id % 2 == 0 { format!("Desk Lamp {}", id) } else { format!("Chair {}", id) },
                description: String::new(),
                price: id as f64 * 10.0,
                category: "home".to_string(),
                sold: id % 3 == 0,
                date_of_sale: Utc.with_ymd_and_hms(2022, if id > 20 { 4 } else { 3 }, 2, 0, 0, 0).unwrap(),
                image: String::new(),
            })
            .collect();
        Arc::new(MemoryStore::with_records(records))
    }

    fn request(page: u32, limit: u32, search: &str) -> ListingRequest {
        ListingRequest {
            page,
            limit,
            filter: ListingFilter {
                month: Month::new(3).unwrap(),
                search: SearchIntent::parse(search),
            },
        }
    }

    #[tokio::test]
    async fn pages_respect_limit_and_total_pages() {
        let service = ListingService::new(store());
        for page in 1..=4 {
            let result = service.list(&request(page, 6, "")).await.unwrap();
            assert_eq!(result.total, 20);
            assert_eq!(result.total_pages, 4);
            assert!(result.products.len() <= 6);
        }
        let last = service.list(&request(4, 6, "")).await.unwrap();
        assert_eq!(last.products.len(), 2);
    }

    #[tokio::test]
    async fn numeric_search_matches_price_or_title() {
        let service = ListingService::new(store());
        // 价格 40 的记录 (id 4), 以及标题含 "4" 的记录 (id 14)
        let result = service.list(&request(1, 10, "40")).await.unwrap();
        let ids: Vec<i64> = result.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4]);

        let result = service.list(&request(1, 10, "14")).await.unwrap();
        let ids: Vec<i64> = result.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![14]);
    }

    #[tokio::test]
    async fn text_search_filters_titles() {
        let service = ListingService::new(store());
        let result = service.list(&request(1, 100, "desk lamp")).await.unwrap();
        assert_eq!(result.total, 10);
        assert!(result.products.iter().all(|p| p.title.starts_with("Desk Lamp")));
    }
}
