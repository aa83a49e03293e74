//! CLI argument definitions and parsing structures.

use clap::{Parser, Subcommand};
use periodical_core::{config::DEFAULT_DB_FILE, EntityId, NewArticle};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[clap(
    name = "periodical",
    version = periodical_core::core_version(),
    about = "Authors, magazines and articles over SQLite"
)]
pub struct Cli {
    /// SQLite database file.
    #[clap(long, env = "PERIODICAL_DB", default_value = DEFAULT_DB_FILE, global = true)]
    pub db: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[clap(long, env = "PERIODICAL_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr when unset).
    #[clap(long, env = "PERIODICAL_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database file and tables if missing
    Setup,
    /// Replace all data with the sample authors, magazines and articles
    Seed,
    /// Run the showcase queries and print their results
    Queries {
        /// Print one JSON document instead of text.
        #[clap(long)]
        json: bool,
    },
    /// Create an author and their articles in one transaction
    AddAuthor {
        /// Author name (must be unique).
        name: String,

        /// Article as `<magazine_id>:<title>[:<content>]` (repeatable).
        #[clap(long = "article", short = 'a')]
        articles: Vec<ArticleArg>,
    },
}

/// One `--article` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleArg {
    pub magazine_id: EntityId,
    pub title: String,
    pub content: String,
}

impl FromStr for ArticleArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, ':');
        let magazine_id = parts
            .next()
            .unwrap_or_default()
            .trim()
            .parse::<EntityId>()
            .map_err(|err| format!("invalid magazine id in `{value}`: {err}"))?;
        let title = parts
            .next()
            .filter(|title| !title.is_empty())
            .ok_or_else(|| format!("missing title in `{value}`"))?;
        let content = parts.next().unwrap_or_default();

        Ok(Self {
            magazine_id,
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

impl From<ArticleArg> for NewArticle {
    fn from(value: ArticleArg) -> Self {
        NewArticle::new(value.title, value.magazine_id).with_content(value.content)
    }
}
