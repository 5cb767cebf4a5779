use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use feedreader_common::{init_logging, LogOptions};
use feedreader_queries::*;
use serde_json::json;

#[derive(Parser)]
#[command(name = "feedreader-queries")]
#[command(about = "Resolve, classify and manage saved feed reader queries")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog snapshot file (JSON or YAML)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Override the saved query directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log level (debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a query given as a URL query string
    Classify {
        /// e.g. "get=c_1&search=rust&state=2"
        query: String,
    },
    /// List a user's saved queries
    List {
        #[arg(short, long)]
        user: String,
    },
    /// Bookmark a query for a user
    Bookmark {
        #[arg(short, long)]
        user: String,
        /// e.g. "get=f_3&order=ASC"
        query: String,
        /// Name for the bookmark
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Rename a saved query
    Rename {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        index: usize,
        #[arg(short, long)]
        name: String,
    },
    /// Move a saved query to another position
    Move {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Remove a saved query
    Remove {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        index: usize,
    },
    /// Remove every saved query whose category or feed is gone
    Prune {
        #[arg(short, long)]
        user: String,
    },
}

fn describe(query: &UserQuery) -> serde_json::Value {
    json!({
        "type": query.get_type(),
        "target_id": query.target().id(),
        "target_name": query.get_name(),
        "deprecated": query.is_deprecated(),
        "has_parameters": query.has_parameters(),
        "has_search": query.has_search(),
        "parameters": query.to_array().to_map(),
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<QueryConfig> {
    let loader = match &cli.config {
        Some(path) => QueryConfigLoader::with_path(path),
        None => QueryConfigLoader::new(),
    };
    let mut config = loader.load().context("loading configuration")?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn build_catalog(cli: &Cli) -> Arc<dyn CatalogSource> {
    match &cli.catalog {
        Some(path) => Arc::new(FileCatalog::new(path)),
        None => {
            tracing::warn!("No catalog given; every category and feed query will be deprecated");
            Arc::new(InMemoryCatalog::new())
        }
    }
}

// Only commands that read or write saved lists need storage, so the data
// directory is created here and nowhere else.
fn build_engine(catalog: Arc<dyn CatalogSource>, config: QueryConfig) -> anyhow::Result<QueryEngine> {
    let persistence = Arc::new(
        FileSystemPersistence::new(&config.data_dir).context("opening saved query storage")?,
    );
    Ok(QueryEngine::new(catalog, persistence, config)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(LogOptions::new(config.log_level()?));
    let catalog = build_catalog(&cli);

    let output = match cli.command {
        Commands::Classify { query } => {
            let raw = RawParameters::from_query_string(&query)?;
            let snapshot = catalog.snapshot()?;
            describe(&UserQuery::from_snapshot(raw, &snapshot))
        }
        Commands::List { user } => {
            let queries = build_engine(catalog, config)?.saved_queries(&user)?;
            json!(queries
                .iter()
                .enumerate()
                .map(|(index, query)| {
                    let mut entry = describe(query);
                    entry["index"] = json!(index);
                    entry
                })
                .collect::<Vec<_>>())
        }
        Commands::Bookmark { user, query, name } => {
            let mut raw = RawParameters::from_query_string(&query)?;
            if name.is_some() {
                raw.name = name;
            }
            let index = build_engine(catalog, config)?.bookmark(&user, raw)?;
            json!({ "index": index })
        }
        Commands::Rename { user, index, name } => {
            build_engine(catalog, config)?.rename(&user, index, &name)?;
            json!({ "index": index, "name": name })
        }
        Commands::Move { user, from, to } => {
            build_engine(catalog, config)?.move_query(&user, from, to)?;
            json!({ "from": from, "to": to })
        }
        Commands::Remove { user, index } => {
            let removed = build_engine(catalog, config)?.remove(&user, index)?;
            json!({ "removed": removed.to_map() })
        }
        Commands::Prune { user } => {
            let removed = build_engine(catalog, config)?.prune_deprecated(&user)?;
            json!({
                "removed": removed.iter().map(RawParameters::to_map).collect::<Vec<_>>()
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
