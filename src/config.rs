use std::env;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub mongo_max_pool_size: u32,
    pub mongo_min_pool_size: u32,
    /// Connect and server-selection timeout.
    pub mongo_timeout_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quiz-local".to_string()),
            mongo_max_pool_size: env::var("MONGO_MAX_POOL_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            mongo_min_pool_size: env::var("MONGO_MIN_POOL_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2),
            mongo_timeout_secs: env::var("MONGO_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(100),
        }
    }

    /// Rejects settings the server cannot start with.
    pub fn validate(&self) -> AppResult<()> {
        if self.mongo_db_name.trim().is_empty() {
            return Err(AppError::InternalError(
                "MONGO_DB_NAME must not be empty".to_string(),
            ));
        }

        if self.mongo_max_pool_size == 0 || self.mongo_min_pool_size > self.mongo_max_pool_size {
            return Err(AppError::InternalError(format!(
                "Invalid MongoDB pool: min {} must not exceed max {} (max >= 1)",
                self.mongo_min_pool_size, self.mongo_max_pool_size
            )));
        }

        if self.mongo_timeout_secs == 0 {
            return Err(AppError::InternalError(
                "MONGO_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        if self.web_server_port == 0 {
            return Err(AppError::InternalError(
                "WEB_SERVER_PORT must be a non-zero port".to_string(),
            ));
        }

        if self.default_page_size < 1 || self.max_page_size < self.default_page_size {
            return Err(AppError::InternalError(format!(
                "Invalid page sizes: default {} must be between 1 and max {}",
                self.default_page_size, self.max_page_size
            )));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quiz-test".to_string(),
            mongo_max_pool_size: 4,
            mongo_min_pool_size: 1,
            mongo_timeout_secs: 2,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}
