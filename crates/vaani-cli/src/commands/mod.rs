//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vaani_graph::GraphConfig;
use vaani_web::AppConfig;

pub mod ask;
pub mod graph;
pub mod iss;
pub mod serve;

/// Vaani - Space Knowledge Assistant
#[derive(Parser)]
#[command(name = "vaani")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file (defaults to <config_dir>/vaani/config.toml)
    #[arg(short, long, global = true, env = "VAANI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server and WhatsApp webhook
    Serve(serve::ServeArgs),

    /// Ask a question from the terminal
    Ask(ask::AskArgs),

    /// Knowledge Graph commands
    #[command(subcommand)]
    Graph(graph::GraphCommands),

    /// Show the current ISS position
    Iss,
}

/// Neo4j connection flags shared by every command that talks to the graph.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// Neo4j bolt URI
    #[arg(long = "neo-uri", env = "NEO_URI", global = true)]
    pub uri: Option<String>,

    /// Neo4j user
    #[arg(long = "neo-user", env = "NEO_USER", global = true)]
    pub user: Option<String>,

    /// Neo4j password
    #[arg(long = "neo-pass", env = "NEO_PASS", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Neo4j database
    #[arg(long = "neo-db", env = "NEO_DB", global = true)]
    pub db: Option<String>,
}

impl GraphArgs {
    /// Overlay the flags that were given onto a file config.
    pub fn apply(self, config: &mut GraphConfig) {
        if let Some(uri) = self.uri {
            config.uri = uri;
        }
        if let Some(user) = self.user {
            config.user = user;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(db) = self.db {
            config.db = db;
        }
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        self.graph.apply(&mut config.graph);
        tracing::debug!(path = ?self.config, uri = %config.graph.uri, "Configuration loaded");

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Ask(args) => ask::execute(args, config).await,
            Commands::Graph(cmd) => graph::execute(cmd, config).await,
            Commands::Iss => iss::execute(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_graph_args_override_only_given_fields() {
        let mut config = GraphConfig::default();
        let args = GraphArgs { uri: Some("bolt://graph:7687".into()), password: Some("pw".into()), ..Default::default() };
        args.apply(&mut config);
        assert_eq!(config.uri, "bolt://graph:7687");
        assert_eq!(config.password, "pw");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.db, "neo4j");
    }

    #[test]
    fn test_ask_subcommand() {
        let cli = Cli::try_parse_from([
            "vaani", "ask", "List ISRO satellites", "--context-id", "me", "--neo-db", "space",
        ])
        .unwrap();
        assert_eq!(cli.graph.db.as_deref(), Some("space"));
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question.as_deref(), Some("List ISRO satellites"));
                assert_eq!(args.context_id, "me");
            }
            _ => panic!("expected ask"),
        }
    }
}
