use periodical_core::{
    ArticleRepository, Author, AuthorRepository, Database, EntityState, MagazineRepository,
    RepoError, SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository,
    ValidationError,
};
use tempfile::TempDir;

fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("articles.db")).unwrap();
    (dir, db)
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);

    for name in ["A", "Zadie Smith", "Chimamanda Ngozi Adichie", "村上春樹"] {
        let created = repo.create(name).unwrap();
        let id = created.id().unwrap();

        let loaded = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.id(), Some(id));
        assert_eq!(loaded.name(), name);
    }
}

#[test]
fn create_rejects_empty_name_without_writing() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);

    let err = repo.create("").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::AuthorNameEmpty)
    ));
    assert!(!err.is_operational());
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn duplicate_name_is_a_unique_violation_and_leaves_instance_unsaved() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    repo.create("Toni Morrison").unwrap();

    let mut duplicate = Author::new("Toni Morrison").unwrap();
    let err = repo.save(&mut duplicate).unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));
    assert!(err.is_operational());
    assert_eq!(duplicate.state(), EntityState::New);
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn save_updates_persisted_author() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let mut author = repo.create("Draft Name").unwrap();

    author.set_name("Final Name").unwrap();
    repo.save(&mut author).unwrap();

    let loaded = repo.get_by_id(author.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded.name(), "Final Name");
}

#[test]
fn update_name_is_durable_immediately() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let mut author = repo.create("Old Name").unwrap();

    repo.update_name(&mut author, "New Name").unwrap();
    assert_eq!(author.name(), "New Name");
    assert!(repo.find_by_name("New Name").unwrap().is_some());
    assert!(repo.find_by_name("Old Name").unwrap().is_none());
}

#[test]
fn update_name_rejects_invalid_and_duplicate_values() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    repo.create("Taken").unwrap();
    let mut author = repo.create("Mine").unwrap();

    let err = repo.update_name(&mut author, "").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo.update_name(&mut author, "Taken").unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));
    assert_eq!(author.name(), "Mine");
    assert_eq!(
        repo.get_by_id(author.id().unwrap()).unwrap().unwrap().name(),
        "Mine"
    );
}

#[test]
fn get_by_id_and_find_by_name_return_none_for_missing_rows() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);

    assert!(repo.get_by_id(999).unwrap().is_none());
    assert!(repo.find_by_name("Nobody").unwrap().is_none());
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn delete_unsaved_author_is_rejected() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);

    let mut author = Author::new("Never Saved").unwrap();
    let err = repo.delete(&mut author).unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted("author")));
}

#[test]
fn delete_detaches_instance_and_blocks_reuse() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let mut author = repo.create("Short Lived").unwrap();
    let id = author.id().unwrap();

    repo.delete(&mut author).unwrap();
    assert_eq!(author.state(), EntityState::Detached);
    assert_eq!(author.id(), None);
    assert!(repo.get_by_id(id).unwrap().is_none());

    assert!(matches!(
        repo.update_name(&mut author, "Revived"),
        Err(RepoError::Detached("author"))
    ));
    assert_eq!(author.name(), "Short Lived");
    assert!(matches!(
        repo.save(&mut author),
        Err(RepoError::Detached("author"))
    ));
    assert!(matches!(
        repo.delete(&mut author),
        Err(RepoError::Detached("author"))
    ));
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn delete_cascades_to_articles() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let magazines = SqliteMagazineRepository::new(&db);
    let articles = SqliteArticleRepository::new(&db);

    let mut author = authors.create("Cascade Author").unwrap();
    let magazine = magazines.create("Cascade Weekly", "News").unwrap();
    authors
        .add_article(&author, &magazine, "First cascade piece", "")
        .unwrap();
    authors
        .add_article(&author, &magazine, "Second cascade piece", "")
        .unwrap();

    let written = authors.articles(&author).unwrap();
    assert_eq!(written.len(), 2);

    authors.delete(&mut author).unwrap();
    for article in written {
        assert!(articles.get_by_id(article.id().unwrap()).unwrap().is_none());
    }
    assert_eq!(magazines.articles(&magazine).unwrap().len(), 0);
}

#[test]
fn magazines_and_topic_areas_are_distinct() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let magazines = SqliteMagazineRepository::new(&db);

    let author = authors.create("Topic Author").unwrap();
    let tech = magazines.create("Tech Weekly", "Technology").unwrap();
    let gadgets = magazines.create("Gadget Monthly", "Technology").unwrap();
    let food = magazines.create("Food Fare", "Food").unwrap();

    authors.add_article(&author, &tech, "Chips and chips", "").unwrap();
    authors.add_article(&author, &tech, "More silicon news", "").unwrap();
    authors.add_article(&author, &gadgets, "Pocket gadgets", "").unwrap();
    authors.add_article(&author, &food, "Street food notes", "").unwrap();

    let contributed: Vec<_> = authors
        .magazines(&author)
        .unwrap()
        .into_iter()
        .map(|magazine| magazine.id().unwrap())
        .collect();
    assert_eq!(
        contributed,
        vec![tech.id().unwrap(), gadgets.id().unwrap(), food.id().unwrap()]
    );

    let topics = authors.topic_areas(&author).unwrap();
    assert_eq!(topics, vec!["Food".to_string(), "Technology".to_string()]);
}

#[test]
fn topic_areas_is_empty_for_author_without_articles() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let author = repo.create("Quiet Author").unwrap();

    assert_eq!(repo.topic_areas(&author).unwrap(), Vec::<String>::new());
    assert!(repo.articles(&author).unwrap().is_empty());
    assert!(repo.magazines(&author).unwrap().is_empty());
}

#[test]
fn relationship_queries_require_persisted_author() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let author = Author::new("Unsaved").unwrap();

    assert!(matches!(
        repo.articles(&author),
        Err(RepoError::NotPersisted("author"))
    ));
    assert!(matches!(
        repo.topic_areas(&author),
        Err(RepoError::NotPersisted("author"))
    ));
}

#[test]
fn topic_areas_reports_storage_failure_as_error() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    let author = repo.create("Broken Storage").unwrap();

    db.connect()
        .unwrap()
        .execute_batch("DROP TABLE articles;")
        .unwrap();

    let err = repo.topic_areas(&author).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn author_with_most_articles_is_none_without_articles() {
    let (_dir, db) = test_db();
    let repo = SqliteAuthorRepository::new(&db);
    assert!(repo.author_with_most_articles().unwrap().is_none());

    repo.create("No Articles Yet").unwrap();
    assert!(repo.author_with_most_articles().unwrap().is_none());
}

#[test]
fn author_with_most_articles_picks_highest_count() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let magazines = SqliteMagazineRepository::new(&db);
    let magazine = magazines.create("Prolific Times", "General").unwrap();

    let light = authors.create("Light Writer").unwrap();
    let heavy = authors.create("Heavy Writer").unwrap();
    authors.add_article(&light, &magazine, "Only one article", "").unwrap();
    for title in ["Heavy one", "Heavy two", "Heavy three"] {
        authors.add_article(&heavy, &magazine, title, "").unwrap();
    }

    let top = authors.author_with_most_articles().unwrap().unwrap();
    assert_eq!(top.id(), heavy.id());
}

#[test]
fn add_article_requires_saved_magazine() {
    let (_dir, db) = test_db();
    let authors = SqliteAuthorRepository::new(&db);
    let author = authors.create("Eager Author").unwrap();
    let magazine = periodical_core::Magazine::new("Unsaved Mag", "Misc").unwrap();

    let err = authors
        .add_article(&author, &magazine, "Nowhere to go", "")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted("magazine")));
}
