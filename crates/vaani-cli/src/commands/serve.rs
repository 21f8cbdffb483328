//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use vaani_graph::GraphClient;
use vaani_web::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Require this key in the X-API-KEY header of /query requests
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path, used with --log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// `<data_dir>/vaani/serve.log`, or `./vaani-serve.log` without a data dir.
pub fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("vaani").join("serve.log"))
        .unwrap_or_else(|| PathBuf::from("vaani-serve.log"))
}

pub async fn execute(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.api_key.is_some() {
        config.server.api_key = args.api_key;
    }

    let client = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Could not reach Neo4j at {}", config.graph.uri))?;

    let base = format!("http://{}:{}", config.server.host, config.server.port);
    println!();
    println!("  {} {}", "Vaani".cyan().bold(), "Space Knowledge Assistant".bold());
    println!();
    println!("  {}     {}/query", "Query".green(), base);
    println!("  {}  {}/whatsapp", "WhatsApp".green(), base);
    println!("  {}       {}/api", "API".green(), base);
    println!("  {}    {}/health", "Health".green(), base);
    if config.server.api_key.is_some() {
        println!("  {}", "API key required for /query".yellow());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    vaani_web::run_server(Arc::new(client), config).await?;

    Ok(())
}
