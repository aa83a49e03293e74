//! Magazine repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/get/delete APIs over the `magazines` table.
//! - Answer contributor and publishing-volume questions through joins.
//!
//! # Invariants
//! - Deleting a magazine cascades to its articles at the storage layer.
//! - `article_counts_per_magazine` includes magazines with zero articles.
//! - `contributing_authors` uses a strict `> 2` article threshold.

use crate::db::Database;
use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::{self, Magazine};
use crate::model::{EntityId, EntityState};
use crate::repo::article_repo::load_articles_by_magazine;
use crate::repo::author_repo::parse_author_row;
use crate::repo::{
    collect_rows, first_row, invalid_row, require_id, with_connection, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

const MAGAZINE_SELECT_SQL: &str = "SELECT
    id,
    name,
    category
FROM magazines";

/// Minimum number of articles (exclusive) for `contributing_authors`.
const CONTRIBUTING_AUTHOR_MIN_ARTICLES: i64 = 2;

/// Read model for per-magazine article totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagazineArticleCount {
    pub magazine_id: EntityId,
    pub name: String,
    pub category: String,
    pub article_count: i64,
}

/// Repository interface for magazine persistence and relationship queries.
pub trait MagazineRepository {
    /// Inserts a new magazine or rewrites a persisted one.
    fn save(&self, magazine: &mut Magazine) -> RepoResult<()>;
    /// Validates, builds and saves a new magazine.
    fn create(&self, name: &str, category: &str) -> RepoResult<Magazine>;
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Magazine>>;
    /// Names are not unique, so this can match several rows.
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Magazine>>;
    fn find_by_category(&self, category: &str) -> RepoResult<Vec<Magazine>>;
    fn get_all(&self) -> RepoResult<Vec<Magazine>>;
    /// Deletes the row (and its articles) and detaches the instance.
    fn delete(&self, magazine: &mut Magazine) -> RepoResult<()>;
    fn update_name(&self, magazine: &mut Magazine, name: &str) -> RepoResult<()>;
    fn update_category(&self, magazine: &mut Magazine, category: &str) -> RepoResult<()>;
    /// Articles published in this magazine.
    fn articles(&self, magazine: &Magazine) -> RepoResult<Vec<Article>>;
    /// Distinct authors who wrote for this magazine.
    fn contributors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>>;
    /// Titles of this magazine's articles; empty when there are none.
    fn article_titles(&self, magazine: &Magazine) -> RepoResult<Vec<String>>;
    /// Authors with more than two articles in this magazine.
    fn contributing_authors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>>;
    /// Magazine with the most articles, or `None` when no articles exist.
    fn top_publisher(&self) -> RepoResult<Option<Magazine>>;
    /// Magazines whose distinct author count is at least `min_authors`.
    fn magazines_with_articles_by_min_authors(&self, min_authors: u32)
        -> RepoResult<Vec<Magazine>>;
    /// Every magazine with its article count, ordered by name.
    fn article_counts_per_magazine(&self) -> RepoResult<Vec<MagazineArticleCount>>;
}

/// SQLite-backed magazine repository.
pub struct SqliteMagazineRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteMagazineRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl MagazineRepository for SqliteMagazineRepository<'_> {
    fn save(&self, magazine: &mut Magazine) -> RepoResult<()> {
        if magazine.state().is_detached() {
            return Err(RepoError::Detached("magazine"));
        }

        with_connection(self.db, "magazine_save", |conn| {
            match magazine.state() {
                EntityState::Persisted(id) => {
                    let changed = conn.execute(
                        "UPDATE magazines SET name = ?1, category = ?2 WHERE id = ?3;",
                        params![magazine.name(), magazine.category(), id],
                    )?;
                    if changed == 0 {
                        return Err(RepoError::NotFound {
                            entity: "magazine",
                            id,
                        });
                    }
                }
                EntityState::New | EntityState::Detached => {
                    conn.execute(
                        "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
                        params![magazine.name(), magazine.category()],
                    )?;
                    magazine.set_state(EntityState::Persisted(conn.last_insert_rowid()));
                }
            }
            Ok(())
        })
    }

    fn create(&self, name: &str, category: &str) -> RepoResult<Magazine> {
        let mut magazine = Magazine::new(name, category)?;
        self.save(&mut magazine)?;
        Ok(magazine)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Magazine>> {
        with_connection(self.db, "magazine_get", |conn| load_magazine(conn, id))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Magazine>> {
        with_connection(self.db, "magazine_find_by_name", |conn| {
            collect_rows(
                conn,
                &format!("{MAGAZINE_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC;"),
                [name],
                parse_magazine_row,
            )
        })
    }

    fn find_by_category(&self, category: &str) -> RepoResult<Vec<Magazine>> {
        with_connection(self.db, "magazine_find_by_category", |conn| {
            collect_rows(
                conn,
                &format!("{MAGAZINE_SELECT_SQL} WHERE category = ?1 ORDER BY id ASC;"),
                [category],
                parse_magazine_row,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Magazine>> {
        with_connection(self.db, "magazine_list", |conn| {
            collect_rows(
                conn,
                &format!("{MAGAZINE_SELECT_SQL} ORDER BY id ASC;"),
                [],
                parse_magazine_row,
            )
        })
    }

    fn delete(&self, magazine: &mut Magazine) -> RepoResult<()> {
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_delete", |conn| {
            let changed = conn.execute("DELETE FROM magazines WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "magazine",
                    id,
                });
            }
            Ok(())
        })?;
        magazine.set_state(EntityState::Detached);
        Ok(())
    }

    fn update_name(&self, magazine: &mut Magazine, name: &str) -> RepoResult<()> {
        magazine::validate_name(name)?;
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_update", |conn| {
            update_column(conn, "name", name, id)
        })?;
        magazine.set_name(name)?;
        Ok(())
    }

    fn update_category(&self, magazine: &mut Magazine, category: &str) -> RepoResult<()> {
        magazine::validate_category(category)?;
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_update", |conn| {
            update_column(conn, "category", category, id)
        })?;
        magazine.set_category(category)?;
        Ok(())
    }

    fn articles(&self, magazine: &Magazine) -> RepoResult<Vec<Article>> {
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_articles", |conn| {
            load_articles_by_magazine(conn, id)
        })
    }

    fn contributors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>> {
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_contributors", |conn| {
            collect_rows(
                conn,
                "SELECT DISTINCT au.id, au.name
                 FROM authors au
                 INNER JOIN articles ar ON ar.author_id = au.id
                 WHERE ar.magazine_id = ?1
                 ORDER BY au.id ASC;",
                [id],
                parse_author_row,
            )
        })
    }

    fn article_titles(&self, magazine: &Magazine) -> RepoResult<Vec<String>> {
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_article_titles", |conn| {
            collect_rows(
                conn,
                "SELECT title FROM articles WHERE magazine_id = ?1 ORDER BY id ASC;",
                [id],
                |row| Ok(row.get::<_, String>("title")?),
            )
        })
    }

    fn contributing_authors(&self, magazine: &Magazine) -> RepoResult<Vec<Author>> {
        let id = require_id(magazine.state(), "magazine")?;
        with_connection(self.db, "magazine_contributing_authors", |conn| {
            collect_rows(
                conn,
                "SELECT au.id, au.name, COUNT(ar.id) AS article_count
                 FROM authors au
                 INNER JOIN articles ar ON ar.author_id = au.id
                 WHERE ar.magazine_id = ?1
                 GROUP BY au.id, au.name
                 HAVING article_count > ?2
                 ORDER BY au.id ASC;",
                params![id, CONTRIBUTING_AUTHOR_MIN_ARTICLES],
                parse_author_row,
            )
        })
    }

    fn top_publisher(&self) -> RepoResult<Option<Magazine>> {
        with_connection(self.db, "magazine_top_publisher", |conn| {
            first_row(
                conn,
                "SELECT m.id, m.name, m.category, COUNT(a.id) AS article_count
                 FROM magazines m
                 INNER JOIN articles a ON a.magazine_id = m.id
                 GROUP BY m.id, m.name, m.category
                 ORDER BY article_count DESC
                 LIMIT 1;",
                [],
                parse_magazine_row,
            )
        })
    }

    fn magazines_with_articles_by_min_authors(
        &self,
        min_authors: u32,
    ) -> RepoResult<Vec<Magazine>> {
        with_connection(self.db, "magazine_min_authors", |conn| {
            collect_rows(
                conn,
                "SELECT m.id, m.name, m.category, COUNT(DISTINCT a.author_id) AS author_count
                 FROM magazines m
                 INNER JOIN articles a ON a.magazine_id = m.id
                 GROUP BY m.id, m.name, m.category
                 HAVING author_count >= ?1
                 ORDER BY m.id ASC;",
                [i64::from(min_authors)],
                parse_magazine_row,
            )
        })
    }

    fn article_counts_per_magazine(&self) -> RepoResult<Vec<MagazineArticleCount>> {
        with_connection(self.db, "magazine_article_counts", |conn| {
            collect_rows(
                conn,
                "SELECT m.id, m.name, m.category, COUNT(a.id) AS article_count
                 FROM magazines m
                 LEFT JOIN articles a ON a.magazine_id = m.id
                 GROUP BY m.id, m.name, m.category
                 ORDER BY m.name ASC, m.id ASC;",
                [],
                |row| {
                    Ok(MagazineArticleCount {
                        magazine_id: row.get("id")?,
                        name: row.get("name")?,
                        category: row.get("category")?,
                        article_count: row.get("article_count")?,
                    })
                },
            )
        })
    }
}

pub(crate) fn load_magazine(conn: &Connection, id: EntityId) -> RepoResult<Option<Magazine>> {
    first_row(
        conn,
        &format!("{MAGAZINE_SELECT_SQL} WHERE id = ?1;"),
        [id],
        parse_magazine_row,
    )
}

pub(crate) fn parse_magazine_row(row: &Row<'_>) -> RepoResult<Magazine> {
    let id: EntityId = row.get("id")?;
    let name: String = row.get("name")?;
    let category: String = row.get("category")?;
    Magazine::with_id(id, name, category).map_err(|err| invalid_row("magazines", id, err))
}

fn update_column(
    conn: &Connection,
    column: &'static str,
    value: &str,
    id: EntityId,
) -> RepoResult<()> {
    let changed = conn.execute(
        &format!("UPDATE magazines SET {column} = ?1 WHERE id = ?2;"),
        params![value, id],
    )?;
    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "magazine",
            id,
        });
    }
    Ok(())
}
