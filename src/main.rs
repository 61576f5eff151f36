// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lala_lookup::app::{create_router, AppState, VERSION};
use lala_lookup::services::handler::SearchHandler;
use lala_lookup::services::indexer::index_files;
use lala_lookup::services::logging;
use lala_lookup::services::query::QueryConfig;
use lala_lookup::services::search::{BackendConfig, MeilisearchBackend, MeilisearchProvider};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "lala-lookup", version = VERSION, about = "Free-text lookup over the document index")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve search invocations over HTTP
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Run a single search and print the summary
    Query {
        input: String,
        /// Treat the input as a raw JSON event instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Upload JSON corpus files to the index
    Index {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env file; real environment variables take precedence
    let _ = dotenvy::dotenv();
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => serve(port).await,
        Command::Query { input, json } => {
            let event = if json {
                serde_json::from_str(&input).context("Input is not valid JSON")?
            } else {
                Value::String(input)
            };

            let handler = search_handler()?;
            println!("{}", handler.handle(&event).await);
            Ok(())
        }
        Command::Index { files } => {
            let config = BackendConfig::from_env()?;
            let backend = MeilisearchBackend::new(&config)?;
            let count = index_files(&backend, &files).await?;
            println!("Indexed {} documents into '{}'", count, config.index_name);
            Ok(())
        }
    }
}

fn search_handler() -> Result<SearchHandler> {
    let query_config = QueryConfig::from_env()?;
    let provider = Arc::new(MeilisearchProvider::from_env());
    Ok(SearchHandler::new(provider, query_config))
}

async fn serve(port: u16) -> Result<()> {
    let state = AppState {
        search_handler: Arc::new(search_handler()?),
    };

    let app = create_router(state);

    // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("lala-lookup v{} listening on {}", VERSION, addr);

    axum::serve(listener, app).await?;

    Ok(())
}
