//! Data-access layer for authors, magazines and the articles linking them.
//! Models validate their fields; repositories own every SQL statement.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::AppConfig;
pub use db::seed::{seed_database, SeedSummary};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::article::Article;
pub use model::author::Author;
pub use model::magazine::Magazine;
pub use model::{EntityId, EntityState, ValidationError};
pub use repo::article_repo::{ArticleRepository, SqliteArticleRepository};
pub use repo::author_repo::{AuthorRepository, NewArticle, SqliteAuthorRepository};
pub use repo::magazine_repo::{MagazineArticleCount, MagazineRepository, SqliteMagazineRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
