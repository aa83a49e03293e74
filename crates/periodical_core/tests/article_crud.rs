use periodical_core::{
    Article, ArticleRepository, AuthorRepository, Database, EntityState, MagazineRepository,
    RepoError, SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository,
    ValidationError,
};
use tempfile::TempDir;

fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("articles.db")).unwrap();
    (dir, db)
}

/// Returns `(author_id, magazine_id)` for a fresh author and magazine.
fn seed_refs(db: &Database) -> (i64, i64) {
    let author = SqliteAuthorRepository::new(db).create("Ref Author").unwrap();
    let magazine = SqliteMagazineRepository::new(db)
        .create("Ref Magazine", "Refs")
        .unwrap();
    (author.id().unwrap(), magazine.id().unwrap())
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);

    let created = repo
        .create("Roundtrip Title", "body text", author_id, magazine_id)
        .unwrap();
    assert!(created.state().is_persisted());

    let loaded = repo.get_by_id(created.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.content(), "body text");
    assert_eq!(repo.get_all().unwrap(), vec![created]);
}

#[test]
fn get_all_on_empty_table_is_empty() {
    let (_dir, db) = test_db();
    let repo = SqliteArticleRepository::new(&db);
    assert!(repo.get_all().unwrap().is_empty());
    assert!(repo.get_by_id(1).unwrap().is_none());
}

#[test]
fn title_bounds_are_enforced_before_writing() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);

    assert!(matches!(
        repo.create("Tiny", "", author_id, magazine_id),
        Err(RepoError::Validation(ValidationError::ArticleTitleLength(4)))
    ));
    assert!(matches!(
        repo.create(&"t".repeat(256), "", author_id, magazine_id),
        Err(RepoError::Validation(ValidationError::ArticleTitleLength(256)))
    ));
    repo.create("Fiver", "", author_id, magazine_id).unwrap();
    repo.create(&"t".repeat(255), "", author_id, magazine_id)
        .unwrap();
    assert_eq!(repo.get_all().unwrap().len(), 2);
}

#[test]
fn missing_author_or_magazine_is_rejected_without_writing() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);

    assert!(matches!(
        repo.create("Orphan by author", "", 999, magazine_id),
        Err(RepoError::MissingReference {
            table: "authors",
            id: 999
        })
    ));
    assert!(matches!(
        repo.create("Orphan by magazine", "", author_id, 999),
        Err(RepoError::MissingReference {
            table: "magazines",
            id: 999
        })
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn non_positive_reference_ids_are_missing_references() {
    let (_dir, db) = test_db();
    let (author_id, _) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);

    assert!(matches!(
        repo.create("Zero reference", "", 0, 1),
        Err(RepoError::MissingReference {
            table: "authors",
            id: 0
        })
    ));
    assert!(matches!(
        repo.create("Negative reference", "", author_id, -1),
        Err(RepoError::MissingReference {
            table: "magazines",
            id: -1
        })
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn invalid_title_update_keeps_persisted_title() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = repo
        .create("Original Title", "", author_id, magazine_id)
        .unwrap();

    let err = repo.update_title(&mut article, "Bad").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(article.title(), "Original Title");

    let loaded = repo.get_by_id(article.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded.title(), "Original Title");
}

#[test]
fn updates_are_written_through() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = repo
        .create("Before Update", "old", author_id, magazine_id)
        .unwrap();

    repo.update_title(&mut article, "After Update").unwrap();
    repo.update_content(&mut article, "new body").unwrap();
    assert_eq!(article.title(), "After Update");

    let loaded = repo.get_by_id(article.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded.title(), "After Update");
    assert_eq!(loaded.content(), "new body");
}

#[test]
fn update_on_unsaved_article_touches_nothing() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = Article::new("Never Saved", "", author_id, magazine_id).unwrap();

    assert!(matches!(
        repo.update_content(&mut article, "body"),
        Err(RepoError::NotPersisted("article"))
    ));
    assert_eq!(article.content(), "");
}

#[test]
fn save_rewrites_persisted_row() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = repo
        .create("Saved Once", "", author_id, magazine_id)
        .unwrap();
    let id = article.id().unwrap();

    article.set_title("Saved Twice").unwrap();
    article.set_content("edited");
    repo.save(&mut article).unwrap();

    assert_eq!(article.id(), Some(id));
    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.title(), "Saved Twice");
    assert_eq!(loaded.content(), "edited");
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn delete_detaches_and_blocks_further_writes() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = repo
        .create("Short Lived", "", author_id, magazine_id)
        .unwrap();
    let id = article.id().unwrap();

    repo.delete(&mut article).unwrap();
    assert_eq!(article.state(), EntityState::Detached);
    assert!(repo.get_by_id(id).unwrap().is_none());

    assert!(matches!(
        repo.save(&mut article),
        Err(RepoError::Detached("article"))
    ));
    assert!(matches!(
        repo.update_title(&mut article, "Resurrected"),
        Err(RepoError::Detached("article"))
    ));
    assert!(matches!(
        repo.delete(&mut article),
        Err(RepoError::Detached("article"))
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn delete_of_row_removed_elsewhere_reports_not_found() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut article = repo
        .create("Removed Elsewhere", "", author_id, magazine_id)
        .unwrap();
    let id = article.id().unwrap();
    let mut stale = repo.get_by_id(id).unwrap().unwrap();

    repo.delete(&mut article).unwrap();
    assert!(matches!(
        repo.delete(&mut stale),
        Err(RepoError::NotFound {
            entity: "article",
            ..
        })
    ));
    assert_eq!(stale.state(), EntityState::Persisted(id));
}

#[test]
fn author_and_magazine_are_loaded_fresh() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let magazines = SqliteMagazineRepository::new(&db);
    let repo = SqliteArticleRepository::new(&db);
    let mut author = authors.create("Fresh Author").unwrap();
    let magazine = magazines.create("Fresh Magazine", "News").unwrap();
    let article = repo
        .create(
            "Lookup Article",
            "",
            author.id().unwrap(),
            magazine.id().unwrap(),
        )
        .unwrap();

    assert_eq!(repo.author(&article).unwrap(), Some(author.clone()));
    assert_eq!(repo.magazine(&article).unwrap(), Some(magazine));

    authors.update_name(&mut author, "Renamed Author").unwrap();
    let reloaded = repo.author(&article).unwrap().unwrap();
    assert_eq!(reloaded.name(), "Renamed Author");
}

#[test]
fn author_lookup_is_none_after_cascade() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let repo = SqliteArticleRepository::new(&db);
    let (author_id, magazine_id) = seed_refs(&db);
    let article = repo
        .create("Orphaned Copy", "", author_id, magazine_id)
        .unwrap();
    let mut author = authors.get_by_id(author_id).unwrap().unwrap();

    authors.delete(&mut author).unwrap();
    assert!(repo.author(&article).unwrap().is_none());
    assert!(repo.get_by_id(article.id().unwrap()).unwrap().is_none());
}

#[test]
fn find_helpers_filter_by_title_and_owner() {
    let (_dir, db) = test_db();
    let (author_id, magazine_id) = seed_refs(&db);
    let other_magazine = SqliteMagazineRepository::new(&db)
        .create("Other Magazine", "Other")
        .unwrap()
        .id()
        .unwrap();
    let repo = SqliteArticleRepository::new(&db);
    let first = repo
        .create("Rust in Production", "", author_id, magazine_id)
        .unwrap();
    let second = repo
        .create("Rusty Bicycles", "", author_id, other_magazine)
        .unwrap();
    repo.create("Gardening Notes", "", author_id, magazine_id)
        .unwrap();

    assert_eq!(
        repo.find_by_title("Rust").unwrap(),
        vec![first.clone(), second.clone()]
    );
    assert!(repo.find_by_title("Quantum").unwrap().is_empty());
    assert_eq!(repo.find_by_author_id(author_id).unwrap().len(), 3);
    assert_eq!(
        repo.find_by_magazine_id(other_magazine).unwrap(),
        vec![second]
    );
    assert!(repo.find_by_author_id(999).unwrap().is_empty());
}
