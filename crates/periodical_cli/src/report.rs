//! Showcase queries over a seeded database, printed as text or JSON.

use anyhow::Result;
use periodical_core::{
    Article, ArticleRepository, Author, AuthorRepository, Database, Magazine,
    MagazineArticleCount, MagazineRepository, SqliteArticleRepository, SqliteAuthorRepository,
    SqliteMagazineRepository,
};
use serde::Serialize;
use std::fmt::Display;

/// Minimum distinct authors for the multi-author magazine query.
const MIN_AUTHORS: u32 = 2;

#[derive(Debug, Serialize)]
pub struct AuthorSection {
    pub author: Author,
    pub articles: Vec<Article>,
    pub magazines: Vec<Magazine>,
    pub topic_areas: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MagazineSection {
    pub magazine: Magazine,
    pub articles: Vec<Article>,
    pub contributors: Vec<Author>,
    pub article_titles: Vec<String>,
    pub contributing_authors: Vec<Author>,
}

#[derive(Debug, Serialize)]
pub struct ArticleSection {
    pub article: Article,
    pub author: Option<Author>,
    pub magazine: Option<Magazine>,
}

#[derive(Debug, Serialize)]
pub struct QueryReport {
    pub first_author: Option<AuthorSection>,
    pub author_with_most_articles: Option<Author>,
    pub first_magazine: Option<MagazineSection>,
    pub magazines_with_min_authors: Vec<Magazine>,
    pub article_counts: Vec<MagazineArticleCount>,
    pub top_publisher: Option<Magazine>,
    pub first_article: Option<ArticleSection>,
}

/// Runs every showcase query against `db`.
pub fn build_report(db: &Database) -> Result<QueryReport> {
    let authors = SqliteAuthorRepository::new(db);
    let magazines = SqliteMagazineRepository::new(db);
    let articles = SqliteArticleRepository::new(db);

    let first_author = match authors.get_all()?.into_iter().next() {
        Some(author) => Some(AuthorSection {
            articles: authors.articles(&author)?,
            magazines: authors.magazines(&author)?,
            topic_areas: authors.topic_areas(&author)?,
            author,
        }),
        None => None,
    };

    let first_magazine = match magazines.get_all()?.into_iter().next() {
        Some(magazine) => Some(MagazineSection {
            articles: magazines.articles(&magazine)?,
            contributors: magazines.contributors(&magazine)?,
            article_titles: magazines.article_titles(&magazine)?,
            contributing_authors: magazines.contributing_authors(&magazine)?,
            magazine,
        }),
        None => None,
    };

    let first_article = match articles.get_all()?.into_iter().next() {
        Some(article) => Some(ArticleSection {
            author: articles.author(&article)?,
            magazine: articles.magazine(&article)?,
            article,
        }),
        None => None,
    };

    Ok(QueryReport {
        first_author,
        author_with_most_articles: authors.author_with_most_articles()?,
        first_magazine,
        magazines_with_min_authors: magazines
            .magazines_with_articles_by_min_authors(MIN_AUTHORS)?,
        article_counts: magazines.article_counts_per_magazine()?,
        top_publisher: magazines.top_publisher()?,
        first_article,
    })
}

/// Renders the report as human-readable sections.
pub fn render_text(report: &QueryReport) -> String {
    let mut out = String::new();

    match &report.first_author {
        Some(section) => {
            let name = section.author.name();
            section_list(
                &mut out,
                &format!("Articles by {name}"),
                section.articles.iter().map(article_line),
            );
            section_list(
                &mut out,
                &format!("Magazines {name} contributed to"),
                section.magazines.iter().map(magazine_line),
            );
            section_list(
                &mut out,
                &format!("Topic areas for {name}"),
                section.topic_areas.iter(),
            );
        }
        None => out.push_str("No authors found.\n"),
    }
    section_list(
        &mut out,
        "Author with the most articles",
        report.author_with_most_articles.iter().map(author_line),
    );

    match &report.first_magazine {
        Some(section) => {
            let name = section.magazine.name();
            section_list(
                &mut out,
                &format!("Articles in {name}"),
                section.articles.iter().map(article_line),
            );
            section_list(
                &mut out,
                &format!("Contributors to {name}"),
                section.contributors.iter().map(author_line),
            );
            section_list(
                &mut out,
                &format!("Article titles in {name}"),
                section.article_titles.iter(),
            );
            section_list(
                &mut out,
                &format!("Authors with more than 2 articles in {name}"),
                section.contributing_authors.iter().map(author_line),
            );
        }
        None => out.push_str("No magazines found.\n"),
    }
    section_list(
        &mut out,
        &format!("Magazines with articles by at least {MIN_AUTHORS} authors"),
        report.magazines_with_min_authors.iter().map(magazine_line),
    );
    section_list(
        &mut out,
        "Article count per magazine",
        report
            .article_counts
            .iter()
            .map(|count| format!("{} ({}): {}", count.name, count.category, count.article_count)),
    );
    section_list(
        &mut out,
        "Top publisher",
        report.top_publisher.iter().map(magazine_line),
    );

    match &report.first_article {
        Some(section) => {
            section_list(
                &mut out,
                "First article",
                std::iter::once(article_line(&section.article)),
            );
            section_list(&mut out, "Its author", section.author.iter().map(author_line));
            section_list(
                &mut out,
                "Its magazine",
                section.magazine.iter().map(magazine_line),
            );
        }
        None => out.push_str("No articles found.\n"),
    }

    out
}

fn section_list<I>(out: &mut String, title: &str, items: I)
where
    I: Iterator,
    I::Item: Display,
{
    out.push_str(&format!("\n--- {title} ---\n"));
    let mut empty = true;
    for item in items {
        empty = false;
        out.push_str(&format!("- {item}\n"));
    }
    if empty {
        out.push_str("(none)\n");
    }
}

fn author_line(author: &Author) -> String {
    format!("#{} {}", author.id().unwrap_or_default(), author.name())
}

fn magazine_line(magazine: &Magazine) -> String {
    format!(
        "#{} {} [{}]",
        magazine.id().unwrap_or_default(),
        magazine.name(),
        magazine.category()
    )
}

fn article_line(article: &Article) -> String {
    format!(
        "#{} \"{}\" (author {}, magazine {})",
        article.id().unwrap_or_default(),
        article.title(),
        article.author_id(),
        article.magazine_id()
    )
}
