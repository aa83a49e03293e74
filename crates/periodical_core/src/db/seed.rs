//! Sample data for local exploration and the `queries` showcase.
//!
//! # Invariants
//! - Seeding replaces all existing rows; it is not additive.
//! - Clearing and inserting run in one transaction; a failed seed leaves
//!   the previous rows in place.

use super::schema::clear_all;
use super::{Database, DbResult};
use log::{error, info};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashMap;

const AUTHORS: [&str; 5] = [
    "J.K. Rowling",
    "George R.R. Martin",
    "Stephen King",
    "Jane Austen",
    "Ernest Hemingway",
];

const MAGAZINES: [(&str, &str); 5] = [
    ("Tech Today", "Technology"),
    ("Literary Review", "Literature"),
    ("Science Monthly", "Science"),
    ("Gourmet World", "Food"),
    ("Adventure Times", "Travel"),
];

/// (title, content, author name, magazine name)
const ARTICLES: [(&str, &str, &str, &str); 15] = [
    (
        "The Magic of Storytelling",
        "An in-depth look at narrative structures.",
        "J.K. Rowling",
        "Literary Review",
    ),
    (
        "World Building 101",
        "Tips for creating believable fictional worlds.",
        "J.K. Rowling",
        "Literary Review",
    ),
    (
        "Exploring Scottish Highlands",
        "A travelogue inspired by magical landscapes.",
        "J.K. Rowling",
        "Adventure Times",
    ),
    (
        "Complex Characters in Epic Fantasy",
        "Essay on character development.",
        "George R.R. Martin",
        "Literary Review",
    ),
    (
        "The Future of Interactive Narratives",
        "Exploring tech in storytelling.",
        "George R.R. Martin",
        "Tech Today",
    ),
    (
        "The Winds of Winter: A Preview",
        "A fictional preview for a fictional magazine.",
        "George R.R. Martin",
        "Literary Review",
    ),
    (
        "The Art of Suspense",
        "How to keep readers on the edge of their seats.",
        "Stephen King",
        "Literary Review",
    ),
    (
        "Horror and Human Psychology",
        "The science behind fear in fiction.",
        "Stephen King",
        "Science Monthly",
    ),
    (
        "My Favorite Diner Food",
        "A surprising take on comfort food from the master of horror.",
        "Stephen King",
        "Gourmet World",
    ),
    (
        "Social Commentary in 19th Century Novels",
        "Analyzing societal norms through literature.",
        "Jane Austen",
        "Literary Review",
    ),
    (
        "A Lady's Journey Through Bath",
        "Travel and society in historical England.",
        "Jane Austen",
        "Adventure Times",
    ),
    (
        "The Iceberg Theory in Writing",
        "Less is more in prose.",
        "Ernest Hemingway",
        "Literary Review",
    ),
    (
        "Fishing in the Gulf Stream",
        "A tale of man and nature.",
        "Ernest Hemingway",
        "Adventure Times",
    ),
    (
        "A Moveable Feast: Parisian Cafes",
        "Recollections of food and drink in Paris.",
        "Ernest Hemingway",
        "Gourmet World",
    ),
    (
        "The Natural World of Cuba",
        "Observations on Cuban flora and fauna.",
        "Ernest Hemingway",
        "Science Monthly",
    ),
];

/// Row counts written by [`seed_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub authors: usize,
    pub magazines: usize,
    pub articles: usize,
}

/// Clears all tables and inserts the sample authors, magazines and articles.
pub fn seed_database(db: &Database) -> DbResult<SeedSummary> {
    let mut conn = db.connect()?;
    match replace_rows(&mut conn) {
        Ok(summary) => {
            info!(
                "event=db_seed module=seed status=ok authors={} magazines={} articles={}",
                summary.authors, summary.magazines, summary.articles
            );
            Ok(summary)
        }
        Err(err) => {
            error!("event=db_seed module=seed status=error error={}", err);
            Err(err)
        }
    }
}

// Dropping `tx` on an early return rolls the wipe back.
fn replace_rows(conn: &mut Connection) -> DbResult<SeedSummary> {
    let tx = conn.transaction()?;
    clear_all(&tx)?;
    let summary = insert_sample_rows(&tx)?;
    tx.commit()?;
    Ok(summary)
}

fn insert_sample_rows(tx: &Transaction<'_>) -> DbResult<SeedSummary> {
    let mut author_ids = HashMap::new();
    for name in AUTHORS {
        tx.execute("INSERT INTO authors (name) VALUES (?1);", [name])?;
        author_ids.insert(name, tx.last_insert_rowid());
    }

    let mut magazine_ids = HashMap::new();
    for (name, category) in MAGAZINES {
        tx.execute(
            "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
            params![name, category],
        )?;
        magazine_ids.insert(name, tx.last_insert_rowid());
    }

    for (title, content, author, magazine) in ARTICLES {
        tx.execute(
            "INSERT INTO articles (title, content, author_id, magazine_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![title, content, author_ids[author], magazine_ids[magazine]],
        )?;
    }

    Ok(SeedSummary {
        authors: AUTHORS.len(),
        magazines: MAGAZINES.len(),
        articles: ARTICLES.len(),
    })
}
