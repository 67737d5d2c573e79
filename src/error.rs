use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 汇总查询类型, 用于错误信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    SalesStats,
    PriceRanges,
    Categories,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregation::SalesStats => "product summary",
            Aggregation::PriceRanges => "product price ranges",
            Aggregation::Categories => "product categories",
        };
        f.write_str(name)
    }
}

/// 业务层错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Error retrieving products: {0}")]
    Listing(#[source] StoreError),

    #[error("Error retrieving {operation}: {source}")]
    Aggregation {
        operation: Aggregation,
        #[source]
        source: StoreError,
    },

    #[error("Server error while fetching data: {0}")]
    SeedFetch(#[from] reqwest::Error),

    #[error("Server error while storing data: {0}")]
    SeedStore(#[source] StoreError),
}

impl ServiceError {
    pub fn aggregation(operation: Aggregation) -> impl FnOnce(StoreError) -> Self {
        move |source| ServiceError::Aggregation { operation, source }
    }
}

/// HTTP 层错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
