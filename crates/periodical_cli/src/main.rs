//! Entry point: parse CLI, configure logging and dispatch to the data layer.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use log::info;
use periodical_core::{
    default_log_level, seed_database, AppConfig, AuthorRepository, Database, NewArticle,
    SqliteAuthorRepository,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig {
        db_path: cli.db,
        log_level: cli
            .log_level
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: cli.log_dir,
    };
    config
        .init_logging()
        .context("failed to initialize logging")?;

    let db = config
        .open_database()
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;

    match cli.command {
        Commands::Setup => {
            println!("Database ready at {}", db.path().display());
        }
        Commands::Seed => {
            let summary = seed_database(&db).context("seeding failed")?;
            println!(
                "Seeded {} authors, {} magazines, {} articles into {}",
                summary.authors,
                summary.magazines,
                summary.articles,
                db.path().display()
            );
        }
        Commands::Queries { json } => {
            let report = report::build_report(&db)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_text(&report));
            }
        }
        Commands::AddAuthor { name, articles } => add_author(&db, &name, articles)?,
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn add_author(db: &Database, name: &str, articles: Vec<cli::ArticleArg>) -> Result<()> {
    let articles: Vec<NewArticle> = articles.into_iter().map(NewArticle::from).collect();
    let author = SqliteAuthorRepository::new(db)
        .add_author_with_articles(name, &articles)
        .with_context(|| format!("author `{name}` was not created; nothing was written"))?;

    println!(
        "Created author #{} {} with {} article(s)",
        author.id().unwrap_or_default(),
        author.name(),
        articles.len()
    );
    Ok(())
}
