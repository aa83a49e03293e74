//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/get/delete APIs over the `articles` table.
//! - Resolve an article's author and magazine on demand.
//!
//! # Invariants
//! - `save` checks both referenced rows exist before writing anything.
//! - Author/magazine lookups always hit storage; nothing is memoized.

use crate::db::Database;
use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::Magazine;
use crate::model::{EntityId, EntityState};
use crate::repo::author_repo::load_author;
use crate::repo::magazine_repo::load_magazine;
use crate::repo::{
    collect_rows, first_row, invalid_row, require_id, row_exists, with_connection, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    author_id,
    magazine_id
FROM articles";

/// Repository interface for article persistence and lookups.
pub trait ArticleRepository {
    /// Inserts a new article or rewrites a persisted one.
    fn save(&self, article: &mut Article) -> RepoResult<()>;
    /// Validates, builds and saves a new article.
    fn create(
        &self,
        title: &str,
        content: &str,
        author_id: EntityId,
        magazine_id: EntityId,
    ) -> RepoResult<Article>;
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Article>>;
    fn get_all(&self) -> RepoResult<Vec<Article>>;
    /// Deletes the row and detaches the instance.
    fn delete(&self, article: &mut Article) -> RepoResult<()>;
    /// Validates and persists a new title, then applies it in memory.
    fn update_title(&self, article: &mut Article, title: &str) -> RepoResult<()>;
    /// Persists new content, then applies it in memory.
    fn update_content(&self, article: &mut Article, content: &str) -> RepoResult<()>;
    /// Loads the author referenced by `author_id`.
    fn author(&self, article: &Article) -> RepoResult<Option<Author>>;
    /// Loads the magazine referenced by `magazine_id`.
    fn magazine(&self, article: &Article) -> RepoResult<Option<Magazine>>;
    /// Substring match on title.
    fn find_by_title(&self, fragment: &str) -> RepoResult<Vec<Article>>;
    fn find_by_author_id(&self, author_id: EntityId) -> RepoResult<Vec<Article>>;
    fn find_by_magazine_id(&self, magazine_id: EntityId) -> RepoResult<Vec<Article>>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteArticleRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn save(&self, article: &mut Article) -> RepoResult<()> {
        if article.state().is_detached() {
            return Err(RepoError::Detached("article"));
        }

        with_connection(self.db, "article_save", |conn| {
            ensure_references_exist(conn, article.author_id(), article.magazine_id())?;

            match article.state() {
                EntityState::Persisted(id) => {
                    let changed = conn.execute(
                        "UPDATE articles
                         SET
                            title = ?1,
                            content = ?2,
                            author_id = ?3,
                            magazine_id = ?4
                         WHERE id = ?5;",
                        params![
                            article.title(),
                            article.content(),
                            article.author_id(),
                            article.magazine_id(),
                            id,
                        ],
                    )?;
                    if changed == 0 {
                        return Err(RepoError::NotFound {
                            entity: "article",
                            id,
                        });
                    }
                }
                EntityState::New | EntityState::Detached => {
                    conn.execute(
                        "INSERT INTO articles (title, content, author_id, magazine_id)
                         VALUES (?1, ?2, ?3, ?4);",
                        params![
                            article.title(),
                            article.content(),
                            article.author_id(),
                            article.magazine_id(),
                        ],
                    )?;
                    article.set_state(EntityState::Persisted(conn.last_insert_rowid()));
                }
            }
            Ok(())
        })
    }

    fn create(
        &self,
        title: &str,
        content: &str,
        author_id: EntityId,
        magazine_id: EntityId,
    ) -> RepoResult<Article> {
        let mut article = Article::new(title, content, author_id, magazine_id)?;
        self.save(&mut article)?;
        Ok(article)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Article>> {
        with_connection(self.db, "article_get", |conn| load_article(conn, id))
    }

    fn get_all(&self) -> RepoResult<Vec<Article>> {
        with_connection(self.db, "article_list", |conn| {
            collect_rows(
                conn,
                &format!("{ARTICLE_SELECT_SQL} ORDER BY id ASC;"),
                [],
                parse_article_row,
            )
        })
    }

    fn delete(&self, article: &mut Article) -> RepoResult<()> {
        let id = require_id(article.state(), "article")?;
        with_connection(self.db, "article_delete", |conn| {
            let changed = conn.execute("DELETE FROM articles WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "article",
                    id,
                });
            }
            Ok(())
        })?;
        article.set_state(EntityState::Detached);
        Ok(())
    }

    fn update_title(&self, article: &mut Article, title: &str) -> RepoResult<()> {
        crate::model::article::validate_title(title)?;
        let id = require_id(article.state(), "article")?;
        with_connection(self.db, "article_update", |conn| {
            update_column(conn, "title", title, id)
        })?;
        article.set_title(title)?;
        Ok(())
    }

    fn update_content(&self, article: &mut Article, content: &str) -> RepoResult<()> {
        let id = require_id(article.state(), "article")?;
        with_connection(self.db, "article_update", |conn| {
            update_column(conn, "content", content, id)
        })?;
        article.set_content(content);
        Ok(())
    }

    fn author(&self, article: &Article) -> RepoResult<Option<Author>> {
        with_connection(self.db, "article_author", |conn| {
            load_author(conn, article.author_id())
        })
    }

    fn magazine(&self, article: &Article) -> RepoResult<Option<Magazine>> {
        with_connection(self.db, "article_magazine", |conn| {
            load_magazine(conn, article.magazine_id())
        })
    }

    fn find_by_title(&self, fragment: &str) -> RepoResult<Vec<Article>> {
        with_connection(self.db, "article_find_by_title", |conn| {
            collect_rows(
                conn,
                &format!("{ARTICLE_SELECT_SQL} WHERE title LIKE '%' || ?1 || '%' ORDER BY id ASC;"),
                [fragment],
                parse_article_row,
            )
        })
    }

    fn find_by_author_id(&self, author_id: EntityId) -> RepoResult<Vec<Article>> {
        with_connection(self.db, "article_find_by_author", |conn| {
            load_articles_by_author(conn, author_id)
        })
    }

    fn find_by_magazine_id(&self, magazine_id: EntityId) -> RepoResult<Vec<Article>> {
        with_connection(self.db, "article_find_by_magazine", |conn| {
            load_articles_by_magazine(conn, magazine_id)
        })
    }
}

pub(crate) fn load_article(conn: &Connection, id: EntityId) -> RepoResult<Option<Article>> {
    first_row(
        conn,
        &format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"),
        [id],
        parse_article_row,
    )
}

pub(crate) fn load_articles_by_author(
    conn: &Connection,
    author_id: EntityId,
) -> RepoResult<Vec<Article>> {
    collect_rows(
        conn,
        &format!("{ARTICLE_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"),
        [author_id],
        parse_article_row,
    )
}

pub(crate) fn load_articles_by_magazine(
    conn: &Connection,
    magazine_id: EntityId,
) -> RepoResult<Vec<Article>> {
    collect_rows(
        conn,
        &format!("{ARTICLE_SELECT_SQL} WHERE magazine_id = ?1 ORDER BY id ASC;"),
        [magazine_id],
        parse_article_row,
    )
}

pub(crate) fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id: EntityId = row.get("id")?;
    let title: String = row.get("title")?;
    let content: String = row.get("content")?;
    Article::with_id(
        id,
        title,
        content,
        row.get("author_id")?,
        row.get("magazine_id")?,
    )
    .map_err(|err| invalid_row("articles", id, err))
}

fn ensure_references_exist(
    conn: &Connection,
    author_id: EntityId,
    magazine_id: EntityId,
) -> RepoResult<()> {
    if !row_exists(conn, "authors", author_id)? {
        return Err(RepoError::MissingReference {
            table: "authors",
            id: author_id,
        });
    }
    if !row_exists(conn, "magazines", magazine_id)? {
        return Err(RepoError::MissingReference {
            table: "magazines",
            id: magazine_id,
        });
    }
    Ok(())
}

fn update_column(
    conn: &Connection,
    column: &'static str,
    value: &str,
    id: EntityId,
) -> RepoResult<()> {
    let changed = conn.execute(
        &format!("UPDATE articles SET {column} = ?1 WHERE id = ?2;"),
        params![value, id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "article",
            id,
        });
    }
    Ok(())
}
