//! Manage the reference snippets stored in the vector database

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use tractorbot_api::{app, config::Config, telemetry::init_logging};
use tractorbot_vector::{ChunkStrategy, Metadata};

#[derive(Parser)]
#[command(name = "tractorbot-admin")]
#[command(about = "Manage Captain Tractors reference content in the vector database")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging (default: warn level)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a document and store every snippet
    Ingest {
        file: PathBuf,
        /// One snippet per `N.` numbered section (default)
        #[arg(long, conflicts_with = "recursive")]
        numbered: bool,
        /// Size-bounded chunks with overlap
        #[arg(long)]
        recursive: bool,
        /// Chunk size in characters (recursive splitter)
        #[arg(long, default_value = "1000")]
        chunk_size: usize,
        /// Characters shared by consecutive chunks (recursive splitter)
        #[arg(long, default_value = "200")]
        overlap: usize,
    },
    /// Store a single snippet
    Add {
        text: String,
        /// Extra metadata as key=value, repeatable
        #[arg(long = "meta", value_parser = parse_meta)]
        meta: Vec<(String, String)>,
    },
    /// Show the snippets closest to a query
    Search {
        query: String,
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,
    },
    /// Delete snippets by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show index statistics
    Stats,
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load().map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    config.logging.level = if cli.verbose { "debug" } else { "warn" }.to_string();
    init_logging(&config.logging);

    let db = app::build_vector_db(&config)
        .await?
        .context("Vector database is not configured (set PINECONE_API_KEY)")?;

    match cli.command {
        Commands::Ingest { file, recursive, chunk_size, overlap, .. } => {
            let strategy = if recursive {
                ChunkStrategy::Recursive { chunk_size, overlap }
            } else {
                ChunkStrategy::Numbered
            };
            let ids = db.ingest_file(&file, strategy).await?;
            println!("Stored {} snippets from {}", ids.len(), file.display());
        }
        Commands::Add { text, meta } => {
            if text.trim().is_empty() {
                bail!("snippet text cannot be empty");
            }
            let metadata: Metadata = meta
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect();
            let id = db.store_context(&text, Some(metadata)).await?;
            println!("{}", id);
        }
        Commands::Search { query, top_k } => {
            let items = db.query_context(&query, top_k).await?;
            if items.is_empty() {
                println!("No matches");
            }
            for item in items {
                println!("{:.4}  {}  {}", item.score, item.id, item.text);
            }
        }
        Commands::Delete { ids } => {
            db.delete(&ids).await?;
            println!("Deleted {} ids", ids.len());
        }
        Commands::Stats => {
            let stats = db.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta() {
        assert_eq!(parse_meta("category=service").unwrap(), ("category".to_string(), "service".to_string()));
        assert_eq!(parse_meta("note=a=b").unwrap().1, "a=b");
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["tractorbot-admin", "search", "DI 450", "-k", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { top_k: 5, .. }));

        let cli = Cli::try_parse_from([
            "tractorbot-admin", "add", "E-Trac is electric", "--meta", "source=brochure",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { meta, .. } => assert_eq!(meta, vec![("source".to_string(), "brochure".to_string())]),
            _ => panic!("expected add"),
        }

        let cli = Cli::try_parse_from(["tractorbot-admin", "ingest", "notes.txt", "--recursive"]).unwrap();
        assert!(matches!(cli.command, Commands::Ingest { recursive: true, chunk_size: 1000, overlap: 200, .. }));

        assert!(Cli::try_parse_from(["tractorbot-admin", "ingest", "f", "--numbered", "--recursive"]).is_err());
        assert!(Cli::try_parse_from(["tractorbot-admin", "delete"]).is_err());
    }
}
