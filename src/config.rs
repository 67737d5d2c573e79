use crate::models::Month;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 默认种子数据地址
pub const DEFAULT_SOURCE_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ingestion: IngestionConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 未配置时使用内存存储
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    pub source_url: String,
    pub timeout_secs: u64,
}

/// 列表分页默认值
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_limit: u32,
    /// 未配置时不限制; 配置后超出的 limit 返回 400
    pub max_limit: Option<u32>,
    pub default_month: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: None,
            default_month: 3,
        }
    }
}

impl ListingConfig {
    /// 启动时校验, 避免请求时才暴露配置错误
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Month::new(self.default_month).is_none() {
            return Err(ConfigError::Message(format!(
                "listing.default_month must be between 1 and 12, got {}",
                self.default_month
            )));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::Message("listing.default_limit must be at least 1".to_string()));
        }
        if let Some(max) = self.max_limit {
            if max < self.default_limit {
                return Err(ConfigError::Message(format!(
                    "listing.max_limit ({}) is below listing.default_limit ({})",
                    max, self.default_limit
                )));
            }
        }
        Ok(())
    }

    /// 默认月份 (校验失败时回退到 3 月)
    pub fn default_month(&self) -> Month {
        Month::new(self.default_month).unwrap_or(Month::MARCH)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            ingestion: IngestionConfig {
                source_url: DEFAULT_SOURCE_URL.to_string(),
                timeout_secs: 30,
            },
            listing: ListingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> dashboard.toml (可选) -> TXN_ 前缀环境变量 -> 兼容旧环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config: AppConfig = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.acquire_timeout_secs", defaults.database.acquire_timeout_secs as i64)?
            .set_default("ingestion.source_url", defaults.ingestion.source_url)?
            .set_default("ingestion.timeout_secs", defaults.ingestion.timeout_secs as i64)?
            .set_default("listing.default_limit", defaults.listing.default_limit as i64)?
            .set_default("listing.default_month", defaults.listing.default_month as i64)?
            .add_source(File::with_name("dashboard").required(false))
            .add_source(
                Environment::with_prefix("TXN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option(
                "server.port",
                std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()).map(i64::from),
            )?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()?;

        config.listing.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.listing.default_limit, 10);
        assert_eq!(config.listing.default_month, 3);
        assert!(config.database.url.is_none());
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.listing.max_limit, None);
        assert!(config.listing.validate().is_ok());
    }

    #[test]
    fn invalid_listing_defaults_are_rejected_up_front() {
        let bad_month = ListingConfig {
            default_month: 13,
            ..ListingConfig::default()
        };
        assert!(bad_month.validate().is_err());

        let zero_limit = ListingConfig {
            default_limit: 0,
            ..ListingConfig::default()
        };
        assert!(zero_limit.validate().is_err());

        let tight_max = ListingConfig {
            max_limit: Some(5),
            ..ListingConfig::default()
        };
        assert!(tight_max.validate().is_err());
    }
}
