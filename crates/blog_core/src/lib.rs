//! Core of a small blog: one `Article` resource with validation, scopes,
//! SQLite persistence and an HTML presentation layer.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod web;

pub use config::{BlogConfig, ConfigError};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::article::{
    Article, ArticleField, ArticleId, ArticleParams, ArticleValidationError, FieldError,
    NewArticle,
};
pub use repo::article_repo::{
    ArticleRepository, ArticleScope, RepoError, RepoResult, SqliteArticleRepository,
};
pub use service::article_service::{ArticleService, ArticleServiceError};
pub use web::{App, HttpResponse, Method, Request, Status};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
