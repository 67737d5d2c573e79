use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 交易记录 (products 表)
/// 字段与种子 JSON 一致, 内部字段 row_id / created_at 不对外暴露
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,               // 外部编号, 不重新生成
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed_json_with_offset_timestamp() {
        let raw = r#"{
            "id": 1,
            "title": "Fjallraven  Foldsack No 1 Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.price, 329.85);
        assert_eq!(product.date_of_sale.to_rfc3339(), "2021-11-27T14:59:54+00:00");

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("dateOfSale").is_some());
        assert!(json.get("row_id").is_none());
    }
}
