//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/get/delete APIs over the `authors` table.
//! - Answer author-centric relationship queries through joins.
//! - Own the author-with-articles composite write.
//!
//! # Invariants
//! - Duplicate names surface as `RepoError::UniqueViolation`; the instance
//!   stays unsaved.
//! - `add_author_with_articles` applies all rows or none.

use crate::db::Database;
use crate::model::article::{self, Article};
use crate::model::author::{self, Author};
use crate::model::magazine::Magazine;
use crate::model::{EntityId, EntityState};
use crate::repo::article_repo::{
    load_articles_by_author, ArticleRepository, SqliteArticleRepository,
};
use crate::repo::magazine_repo::parse_magazine_row;
use crate::repo::{
    collect_rows, first_row, invalid_row, require_id, row_exists, with_connection, RepoError,
    RepoResult,
};
use log::{info, warn};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name
FROM authors";

/// One article to insert alongside a new author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub magazine_id: EntityId,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, magazine_id: EntityId) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            magazine_id,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Repository interface for author persistence and relationship queries.
pub trait AuthorRepository {
    /// Inserts a new author or rewrites a persisted one.
    fn save(&self, author: &mut Author) -> RepoResult<()>;
    /// Validates, builds and saves a new author.
    fn create(&self, name: &str) -> RepoResult<Author>;
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Author>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn get_all(&self) -> RepoResult<Vec<Author>>;
    /// Deletes the row (and its articles) and detaches the instance.
    fn delete(&self, author: &mut Author) -> RepoResult<()>;
    /// Validates and persists a new name, then applies it in memory.
    fn update_name(&self, author: &mut Author, name: &str) -> RepoResult<()>;
    /// Articles written by this author.
    fn articles(&self, author: &Author) -> RepoResult<Vec<Article>>;
    /// Distinct magazines this author wrote for.
    fn magazines(&self, author: &Author) -> RepoResult<Vec<Magazine>>;
    /// Distinct categories of those magazines; empty when there are none.
    fn topic_areas(&self, author: &Author) -> RepoResult<Vec<String>>;
    /// Writes one new article for this author in `magazine`.
    fn add_article(
        &self,
        author: &Author,
        magazine: &Magazine,
        title: &str,
        content: &str,
    ) -> RepoResult<Article>;
    /// Author with the most articles, or `None` when no articles exist.
    fn author_with_most_articles(&self) -> RepoResult<Option<Author>>;
    /// Creates one author and all of `articles` in a single transaction.
    fn add_author_with_articles(&self, name: &str, articles: &[NewArticle])
        -> RepoResult<Author>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteAuthorRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn save(&self, author: &mut Author) -> RepoResult<()> {
        if author.state().is_detached() {
            return Err(RepoError::Detached("author"));
        }

        with_connection(self.db, "author_save", |conn| {
            match author.state() {
                EntityState::Persisted(id) => update_name_column(conn, author.name(), id)?,
                EntityState::New | EntityState::Detached => {
                    conn.execute("INSERT INTO authors (name) VALUES (?1);", [author.name()])?;
                    author.set_state(EntityState::Persisted(conn.last_insert_rowid()));
                }
            }
            Ok(())
        })
    }

    fn create(&self, name: &str) -> RepoResult<Author> {
        let mut author = Author::new(name)?;
        self.save(&mut author)?;
        Ok(author)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Author>> {
        with_connection(self.db, "author_get", |conn| load_author(conn, id))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        with_connection(self.db, "author_find_by_name", |conn| {
            first_row(
                conn,
                &format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_author_row,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Author>> {
        with_connection(self.db, "author_list", |conn| {
            collect_rows(
                conn,
                &format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"),
                [],
                parse_author_row,
            )
        })
    }

    fn delete(&self, author: &mut Author) -> RepoResult<()> {
        let id = require_id(author.state(), "author")?;
        with_connection(self.db, "author_delete", |conn| {
            let changed = conn.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "author",
                    id,
                });
            }
            Ok(())
        })?;
        author.set_state(EntityState::Detached);
        Ok(())
    }

    fn update_name(&self, author: &mut Author, name: &str) -> RepoResult<()> {
        author::validate_name(name)?;
        let id = require_id(author.state(), "author")?;
        with_connection(self.db, "author_update", |conn| {
            update_name_column(conn, name, id)
        })?;
        author.set_name(name)?;
        Ok(())
    }

    fn articles(&self, author: &Author) -> RepoResult<Vec<Article>> {
        let id = require_id(author.state(), "author")?;
        with_connection(self.db, "author_articles", |conn| {
            load_articles_by_author(conn, id)
        })
    }

    fn magazines(&self, author: &Author) -> RepoResult<Vec<Magazine>> {
        let id = require_id(author.state(), "author")?;
        with_connection(self.db, "author_magazines", |conn| {
            collect_rows(
                conn,
                "SELECT DISTINCT m.id, m.name, m.category
                 FROM magazines m
                 INNER JOIN articles a ON a.magazine_id = m.id
                 WHERE a.author_id = ?1
                 ORDER BY m.id ASC;",
                [id],
                parse_magazine_row,
            )
        })
    }

    fn topic_areas(&self, author: &Author) -> RepoResult<Vec<String>> {
        let id = require_id(author.state(), "author")?;
        with_connection(self.db, "author_topic_areas", |conn| {
            collect_rows(
                conn,
                "SELECT DISTINCT m.category
                 FROM magazines m
                 INNER JOIN articles a ON a.magazine_id = m.id
                 WHERE a.author_id = ?1
                 ORDER BY m.category ASC;",
                [id],
                |row| Ok(row.get::<_, String>("category")?),
            )
        })
    }

    fn add_article(
        &self,
        author: &Author,
        magazine: &Magazine,
        title: &str,
        content: &str,
    ) -> RepoResult<Article> {
        let author_id = require_id(author.state(), "author")?;
        let magazine_id = require_id(magazine.state(), "magazine")?;
        SqliteArticleRepository::new(self.db).create(title, content, author_id, magazine_id)
    }

    fn author_with_most_articles(&self) -> RepoResult<Option<Author>> {
        with_connection(self.db, "author_most_articles", |conn| {
            first_row(
                conn,
                "SELECT au.id, au.name, COUNT(ar.id) AS article_count
                 FROM authors au
                 INNER JOIN articles ar ON ar.author_id = au.id
                 GROUP BY au.id, au.name
                 ORDER BY article_count DESC
                 LIMIT 1;",
                [],
                parse_author_row,
            )
        })
    }

    fn add_author_with_articles(
        &self,
        name: &str,
        articles: &[NewArticle],
    ) -> RepoResult<Author> {
        let mut author = Author::new(name)?;

        with_connection(self.db, "author_with_articles", |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            match insert_author_with_articles(&tx, author.name(), articles) {
                Ok(author_id) => {
                    tx.commit()?;
                    author.set_state(EntityState::Persisted(author_id));
                    info!(
                        "event=author_with_articles module=repo status=ok author_id={} articles={}",
                        author_id,
                        articles.len()
                    );
                    Ok(())
                }
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback() {
                        warn!(
                            "event=author_with_articles module=repo status=rollback_failed error={}",
                            rollback_err
                        );
                    } else {
                        warn!(
                            "event=author_with_articles module=repo status=rolled_back articles={}",
                            articles.len()
                        );
                    }
                    Err(err)
                }
            }
        })?;

        Ok(author)
    }
}

pub(crate) fn load_author(conn: &Connection, id: EntityId) -> RepoResult<Option<Author>> {
    first_row(
        conn,
        &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
        [id],
        parse_author_row,
    )
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: EntityId = row.get("id")?;
    let name: String = row.get("name")?;
    Author::with_id(id, name).map_err(|err| invalid_row("authors", id, err))
}

fn update_name_column(conn: &Connection, name: &str, id: EntityId) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE authors SET name = ?1 WHERE id = ?2;",
        params![name, id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "author",
            id,
        });
    }
    Ok(())
}

/// Runs every insert of the composite write; the caller commits or rolls back.
fn insert_author_with_articles(
    tx: &Transaction<'_>,
    name: &str,
    articles: &[NewArticle],
) -> RepoResult<EntityId> {
    tx.execute("INSERT INTO authors (name) VALUES (?1);", [name])?;
    let author_id = tx.last_insert_rowid();

    for entry in articles {
        article::validate_title(&entry.title)?;
        if !row_exists(tx, "magazines", entry.magazine_id)? {
            return Err(RepoError::MissingReference {
                table: "magazines",
                id: entry.magazine_id,
            });
        }
        tx.execute(
            "INSERT INTO articles (title, content, author_id, magazine_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![entry.title, entry.content, author_id, entry.magazine_id],
        )?;
    }

    Ok(author_id)
}
