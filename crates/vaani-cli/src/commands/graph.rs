//! Knowledge Graph CLI commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use vaani_graph::GraphClient;
use vaani_web::AppConfig;

use crate::output;

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Show node counts per category
    Status,

    /// Create uniqueness constraints and the name search index
    Schema,

    /// Full-text search over node names
    Search {
        /// Text to search for
        text: String,

        /// Maximum number of matches
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

pub async fn execute(cmd: GraphCommands, config: AppConfig) -> Result<()> {
    let client = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Could not reach Neo4j at {}", config.graph.uri))?;

    match cmd {
        GraphCommands::Status => cmd_status(&client).await,
        GraphCommands::Schema => cmd_schema(&client).await,
        GraphCommands::Search { text, limit } => cmd_search(&client, &text, limit).await,
    }
}

/// Show per-category node counts.
async fn cmd_status(client: &GraphClient) -> Result<()> {
    println!("{} {}", "Knowledge Graph".bold(), client.config().uri.dimmed());
    println!("{}", "─".repeat(40));

    let counts = client.label_counts().await?;
    output::print_label_counts(&counts);

    Ok(())
}

/// Create constraints and indexes.
async fn cmd_schema(client: &GraphClient) -> Result<()> {
    println!("{}", "Initializing graph schema...".bold());

    let applied = vaani_graph::initialize_schema(client).await?;

    println!("{} {} statements applied", "✓".green(), applied);
    Ok(())
}

/// Search node names.
async fn cmd_search(client: &GraphClient, text: &str, limit: usize) -> Result<()> {
    let matches = vaani_graph::search_names(client, text, limit).await?;
    output::print_name_matches(&matches);
    Ok(())
}
